//! livetrack cli - follow a vehicle from a stream of position reports

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::thread;
use std::time::{Duration, Instant};

use argopt::{cmd_group, subcmd};
use serde::Deserialize;
use tracing::debug;

use livetrack::sources::{LineSource, PayloadSource, SourceEvent};
use livetrack::surface::{RecordingSurface, SurfaceCommand};
use livetrack::{validate, LiveTracker, TrackerOptions};

/// CLI of livetrack - Animate a tracked vehicle from its live position reports
#[cmd_group(commands = [follow, check])]
fn main() -> Result<(), String> {}

/// Drive the tracker from one JSON report per line and print the map commands
#[subcmd]
fn follow(
    /// Read reports from this file instead of stdin
    #[opt(long)]
    input: Option<String>,
    /// Tracker configuration. Default: .livetrack.yaml, ~/.livetrack.yaml
    #[opt(long)]
    config: Option<String>,
) -> Result<(), String> {
    init_logging();

    let options = load_configs(config);
    let frame_interval = Duration::from_millis(options.frame_interval.max(1));

    let mut source = match input {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("Failed on open the input file: {}", e.to_string()))?;
            LineSource::new(BufReader::new(file))
        }
        None => LineSource::new(BufReader::new(io::stdin())),
    };

    let mut tracker = LiveTracker::new(RecordingSurface::new(), options);
    let started = Instant::now();
    let mut closed = false;

    loop {
        if closed {
            if tracker.surface().pending_frames().is_empty() {
                break;
            }
            thread::sleep(frame_interval);
        } else {
            match source.poll(frame_interval)? {
                Some(SourceEvent::Payload(raw)) => match tracker.on_payload(&raw) {
                    Ok(outcome) => debug!("report {:?}", outcome),
                    // rejections are logged by the tracker
                    Err(_) => {}
                },
                Some(SourceEvent::Closed) => closed = true,
                None => {}
            }
        }

        // one callback per frame boundary, the tracker keeps at most one pending
        let now = started.elapsed().as_secs_f64() * 1000.0;
        if let Some(handle) = tracker.surface_mut().next_frame() {
            tracker.on_frame(handle, now);
        }

        for cmd in tracker.surface_mut().take_commands() {
            if let Some(line) = describe(&cmd) {
                println!("{:>9.1} {}", now, line);
            }
        }
    }

    tracker.teardown();

    if let Some(status) = tracker.status() {
        println!(
            "{} {} {} {} ({}) ignition {} {} gps {} trail {}",
            status.device_id,
            status.location,
            status.speed,
            status.bearing,
            status.compass,
            status.ignition,
            status.motion,
            status.gps,
            tracker.trail().len()
        );
    }

    Ok(())
}

/// Validate one JSON report per line
#[subcmd]
fn check(
    /// Read reports from this file instead of stdin
    #[opt(long)]
    input: Option<String>,
) -> Result<(), String> {
    init_logging();

    let reader: Box<dyn BufRead> = match input {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("Failed on open the input file: {}", e.to_string()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut rejected = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed on read some line: {}", e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        match validate(&line) {
            Ok(report) => println!(
                "{}: ok {} {:.6}, {:.6}",
                idx + 1,
                report.device_id,
                report.latitude,
                report.longitude
            ),
            Err(e) => {
                rejected += 1;
                println!("{}: rejected {}", idx + 1, e);
            }
        }
    }

    if rejected > 0 {
        return Err(format!("{} report(s) rejected", rejected));
    }

    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// One line per map command, frame bookkeeping left out
fn describe(cmd: &SurfaceCommand) -> Option<String> {
    let line = match cmd {
        SurfaceCommand::PlaceMarker { pose, style, title } => format!(
            "place  {:.6}, {:.6} {:.1}° {} {}",
            pose.position.y(),
            pose.position.x(),
            pose.bearing,
            style.fill_color,
            title
        ),
        SurfaceCommand::MoveMarker(pose) => format!(
            "move   {:.6}, {:.6} {:.1}°",
            pose.position.y(),
            pose.position.x(),
            pose.bearing
        ),
        SurfaceCommand::StyleMarker(style) => format!("style  {}", style.fill_color),
        SurfaceCommand::SetPath(path) => format!("path   {} point(s)", path.len()),
        SurfaceCommand::FitBounds(b) => format!(
            "fit    {:.6}, {:.6} .. {:.6}, {:.6}",
            b.min().y,
            b.min().x,
            b.max().y,
            b.max().x
        ),
        SurfaceCommand::OpenOverlay { at, .. } => {
            format!("overlay open {:.6}, {:.6}", at.y(), at.x())
        }
        SurfaceCommand::UpdateOverlay(_) => "overlay update".to_string(),
        SurfaceCommand::MoveOverlay(at) => format!("overlay move {:.6}, {:.6}", at.y(), at.x()),
        SurfaceCommand::CloseOverlay => "overlay close".to_string(),
        SurfaceCommand::RequestFrame(_) | SurfaceCommand::CancelFrame(_) => return None,
    };

    Some(line)
}

/// Load the current config
fn load_configs(provided: Option<String>) -> TrackerOptions {
    let mut options = vec![];

    if let Some(sprovided) = provided {
        options.push(sprovided);
    }

    options.push(".livetrack.yaml".to_string());

    if let Some(home) = dirs::home_dir() {
        if let Some(shome) = home.to_str() {
            options.push(format!("{}/.livetrack.yaml", shome));
        }
    }

    let mut yaml: Option<String> = None;
    for fi in options {
        if let Ok(s) = fs::read_to_string(fi) {
            yaml = Some(s);
            break;
        }
    }

    if let Some(s) = yaml {
        match serde_yaml::from_str::<Configs>(&s) {
            Ok(conf) => return conf.tracker,
            Err(e) => eprintln!("ignoring config: {}", e),
        }
    }

    TrackerOptions::default()
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Configs {
    pub tracker: TrackerOptions,
}

#[test]
fn parse_configs() -> Result<(), String> {
    let yaml = "\ntracker: {}";

    let conf: Configs = serde_yaml::from_str(&yaml).map_err(|e| e.to_string())?;

    assert_eq!(
        Configs {
            tracker: TrackerOptions::default()
        },
        conf
    );

    let yaml = "\ntracker:\n  device: \"700070635323\"\n  animation_duration: 1500";

    let conf: Configs = serde_yaml::from_str(&yaml).map_err(|e| e.to_string())?;

    assert_eq!(
        Configs {
            tracker: TrackerOptions::new()
                .device("700070635323")
                .animation_duration(1500.0)
        },
        conf
    );

    Ok(())
}
