//! Live tracking engine API

use geo::geometry::Point;
use time::OffsetDateTime;
use tracing::{debug, trace, warn};

use super::motion::{MotionInterpolator, Pose};
use super::options::TrackerOptions;
use super::presenter::{present, MarkerStyle, PresentedStatus};
use super::report::{validate, PositionReport};
use super::trail::TrailBuffer;
use super::viewport::Viewport;
use crate::error::{ReportError, Result};
use crate::surface::{FrameHandle, RenderingSurface};

/// Where the engine stands for its device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    Uninitialized,
    Idle,
    Animating,
}

/// What an accepted report did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportOutcome {
    /// First report, marker placed
    Initialized,
    /// Position changed, animation (re)started
    Moved,
    /// Same position as the trail head
    Unchanged,
}

/// Follows one device on a rendering surface
pub struct LiveTracker<S: RenderingSurface> {
    surface: S,
    options: TrackerOptions,
    device: Option<String>,
    motion: MotionInterpolator,
    trail: TrailBuffer,
    viewport: Viewport,
    latest: Option<PositionReport>,
    status: Option<PresentedStatus>,
    last_update: Option<OffsetDateTime>,
    overlay_open: bool,
}

impl<S: RenderingSurface> LiveTracker<S> {
    pub fn new(surface: S, options: TrackerOptions) -> Self {
        Self {
            surface,
            device: options.device.clone(),
            motion: MotionInterpolator::new(
                options.animation_duration,
                options.bearing_interpolation,
            ),
            trail: TrailBuffer::new(options.trail_capacity),
            viewport: Viewport::new(),
            latest: None,
            status: None,
            last_update: None,
            overlay_open: false,
            options,
        }
    }

    /// Handle one serialized report from the stream
    pub fn on_payload(&mut self, raw: &str) -> Result<ReportOutcome> {
        if !self.surface.is_ready() {
            debug!("surface not ready, dropping report");
            return Err(ReportError::SurfaceUnavailable);
        }

        let report = validate(raw).map_err(|e| {
            warn!("rejected report: {}", e);
            e
        })?;

        self.on_report(report)
    }

    /// Handle one validated report
    pub fn on_report(&mut self, report: PositionReport) -> Result<ReportOutcome> {
        if !self.surface.is_ready() {
            debug!("surface not ready, dropping report");
            return Err(ReportError::SurfaceUnavailable);
        }

        match &self.device {
            Some(dev) if *dev != report.device_id => {
                let e = ReportError::validation(format!(
                    "report for device `{}` while tracking `{}`",
                    report.device_id, dev
                ));
                warn!("rejected report: {}", e);
                return Err(e);
            }
            Some(_) => {}
            None => self.device = Some(report.device_id.clone()),
        }

        let point = report.point();
        let style = MarkerStyle::for_ignition(report.ignition_on);
        let ignition_changed = self
            .latest
            .as_ref()
            .map(|l| l.ignition_on != report.ignition_on)
            .unwrap_or(false);

        let outcome = match self.motion.target() {
            None => {
                let pose = Pose::new(point, report.pose_bearing(0.0));
                self.motion.place(pose);
                self.surface
                    .place_marker(&pose, &style, &format!("Vehicle: {}", report.device_id));

                self.trail.append(point);
                self.surface.set_path(&self.trail.path());
                self.viewport.extend(point);
                self.viewport.request_fit(&mut self.surface);

                debug!("tracking `{}` from ({}, {})", report.device_id, point.y(), point.x());
                ReportOutcome::Initialized
            }
            Some(_) if self.trail.last() == Some(point) => {
                if ignition_changed {
                    self.surface.style_marker(&style);
                }
                ReportOutcome::Unchanged
            }
            Some(target) if self.trail.is_empty() && target.position == point => {
                // cleared trail, vehicle still where the marker is headed
                self.trail.append(point);
                self.surface.set_path(&self.trail.path());
                self.viewport.extend(point);
                self.viewport.request_fit(&mut self.surface);
                if ignition_changed {
                    self.surface.style_marker(&style);
                }
                ReportOutcome::Unchanged
            }
            Some(target) => {
                let displayed = self.displayed_position().unwrap_or(target.position);
                let pose = Pose::new(point, report.pose_bearing(target.bearing));
                self.motion.retarget(&mut self.surface, displayed, pose);

                self.trail.append(point);
                self.surface.set_path(&self.trail.path());
                self.viewport.extend(point);
                self.viewport.request_fit(&mut self.surface);
                self.surface.style_marker(&style);

                ReportOutcome::Moved
            }
        };

        let status = present(&report);
        if self.overlay_open {
            self.surface.update_overlay(&status.overlay_content());
        }

        self.status = Some(status);
        self.latest = Some(report);
        self.last_update = Some(OffsetDateTime::now_utc());

        Ok(outcome)
    }

    /// Frame callback from the host event loop, `now` in milliseconds
    pub fn on_frame(&mut self, handle: FrameHandle, now: f64) {
        if !self.motion.claim_frame(handle) {
            return;
        }

        if let Some(pose) = self.motion.step(&mut self.surface, now) {
            self.surface.move_marker(&pose);
            if self.overlay_open {
                self.surface.move_overlay(pose.position);
            }
        }
    }

    /// Marker was clicked: show the detail overlay
    pub fn on_marker_click(&mut self) {
        let content = match &self.status {
            Some(status) => status.overlay_content(),
            None => return,
        };

        if let Some(at) = self.displayed_position() {
            self.surface.open_overlay(&content, at);
            self.overlay_open = true;
        }
    }

    /// The user closed the overlay on the surface
    pub fn on_overlay_closed(&mut self) {
        self.overlay_open = false;
    }

    pub fn close_overlay(&mut self) {
        if self.overlay_open {
            self.surface.close_overlay();
            self.overlay_open = false;
        }
    }

    /// Frame the trail again
    pub fn center_map(&mut self) -> bool {
        self.viewport.request_fit(&mut self.surface)
    }

    /// Drop the trail and frame the marker alone
    pub fn clear_path(&mut self) {
        let marker = match self.displayed_position() {
            Some(p) => p,
            None => return,
        };

        self.trail.clear();
        self.surface.set_path(&[]);
        self.viewport.reseed(marker);
        self.viewport.request_fit(&mut self.surface);

        debug!("trail cleared, viewport reseeded at ({}, {})", marker.y(), marker.x());
    }

    /// Stop animating, e.g. before the surface goes away
    pub fn teardown(&mut self) {
        trace!("teardown");
        self.motion.cancel(&mut self.surface);
        self.close_overlay();
    }

    fn displayed_position(&self) -> Option<Point> {
        self.surface
            .marker_position()
            .or_else(|| self.motion.displayed().map(|p| p.position))
    }

    pub fn state(&self) -> TrackerState {
        if self.motion.target().is_none() {
            TrackerState::Uninitialized
        } else if self.motion.is_animating() {
            TrackerState::Animating
        } else {
            TrackerState::Idle
        }
    }

    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn latest(&self) -> Option<&PositionReport> {
        self.latest.as_ref()
    }

    pub fn status(&self) -> Option<&PresentedStatus> {
        self.status.as_ref()
    }

    /// Wall clock time of the last accepted report
    pub fn last_update(&self) -> Option<OffsetDateTime> {
        self.last_update
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn motion(&self) -> &MotionInterpolator {
        &self.motion
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    pub fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
