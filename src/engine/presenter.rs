//! Vehicle status presentation

use time::macros::format_description;

use super::report::PositionReport;

const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

pub const IGNITION_ON_COLOR: &str = "#10b981";
pub const IGNITION_OFF_COLOR: &str = "#ef4444";

/// Marker look, keyed by ignition state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerStyle {
    pub fill_color: String,
}

impl MarkerStyle {
    pub fn for_ignition(on: bool) -> Self {
        let color = if on { IGNITION_ON_COLOR } else { IGNITION_OFF_COLOR };

        Self {
            fill_color: color.to_string(),
        }
    }
}

/// Eight-point compass name of a bearing
pub fn compass_label(bearing: f64) -> &'static str {
    let index = (bearing / 45.0).round().rem_euclid(8.0) as usize;

    DIRECTIONS[index % 8]
}

/// Read-only projection of the latest report
#[derive(Clone, Debug, PartialEq)]
pub struct PresentedStatus {
    pub device_id: String,
    /// Device time, `-` when unknown
    pub time: String,
    pub speed: String,
    pub bearing: String,
    pub compass: &'static str,
    pub location: String,
    pub ignition: &'static str,
    pub motion: &'static str,
    pub gps: &'static str,
    pub ignition_on: bool,
}

pub fn present(report: &PositionReport) -> PresentedStatus {
    let time_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let time = report
        .time
        .and_then(|tm| tm.format(time_format).ok())
        .unwrap_or_else(|| "-".to_string());

    let heading = report.bearing.unwrap_or(0.0);

    PresentedStatus {
        device_id: report.device_id.clone(),
        time,
        speed: format!("{} km/h", report.speed),
        bearing: match report.bearing {
            Some(b) => format!("{}°", b),
            None => "-".to_string(),
        },
        compass: compass_label(heading),
        location: format!("{:.6}, {:.6}", report.latitude, report.longitude),
        ignition: if report.ignition_on { "ON" } else { "OFF" },
        motion: if report.moving { "Moving" } else { "Stationary" },
        gps: if report.gps_active { "Active" } else { "Inactive" },
        ignition_on: report.ignition_on,
    }
}

impl PresentedStatus {
    /// Detail panel markup shown next to the marker
    pub fn overlay_content(&self) -> String {
        let ignition_class = if self.ignition_on { "on" } else { "off" };
        let rows = [
            ("IMEI", self.device_id.as_str(), ""),
            ("Time", self.time.as_str(), ""),
            ("Speed", self.speed.as_str(), ""),
            ("Bearing", self.bearing.as_str(), ""),
            ("Heading", self.compass, ""),
            ("Location", self.location.as_str(), ""),
            ("Ignition", self.ignition, ignition_class),
            ("Motion", self.motion, ""),
            ("GPS", self.gps, ""),
        ];

        let mut html = String::from("<div class=\"vehicle-status\"><h3>Vehicle Status</h3><dl>");
        for (label, value, class) in rows {
            if class.is_empty() {
                html.push_str(&format!("<dt>{}</dt><dd>{}</dd>", label, escape(value)));
            } else {
                html.push_str(&format!(
                    "<dt>{}</dt><dd class=\"{}\">{}</dd>",
                    label,
                    class,
                    escape(value)
                ));
            }
        }
        html.push_str("</dl></div>");

        html
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
pub mod tests {
    use geo::geometry::Point;
    use time::macros::datetime;

    use super::{compass_label, present, MarkerStyle};
    use crate::PositionReport;

    #[test]
    fn compass() {
        assert_eq!("N", compass_label(0.0));
        assert_eq!("N", compass_label(22.0));
        assert_eq!("NE", compass_label(23.0));
        assert_eq!("NE", compass_label(44.0));
        assert_eq!("NE", compass_label(46.0));
        assert_eq!("E", compass_label(90.0));
        assert_eq!("SE", compass_label(135.0));
        assert_eq!("S", compass_label(180.0));
        assert_eq!("SW", compass_label(225.0));
        assert_eq!("W", compass_label(270.0));
        assert_eq!("NW", compass_label(315.0));
        assert_eq!("N", compass_label(359.0));
    }

    #[test]
    fn status_fields() {
        let mut report = PositionReport::basic(
            "700070635323".to_string(),
            Point::new(77.198824, 28.538536),
            Some(datetime!(2025-03-10 10:15:30 UTC)),
        );
        report.speed = 35.0;
        report.bearing = Some(90.0);
        report.ignition_on = true;
        report.moving = true;

        let status = present(&report);
        assert_eq!("700070635323", status.device_id);
        assert_eq!("2025-03-10 10:15:30", status.time);
        assert_eq!("35 km/h", status.speed);
        assert_eq!("90°", status.bearing);
        assert_eq!("E", status.compass);
        assert_eq!("28.538536, 77.198824", status.location);
        assert_eq!("ON", status.ignition);
        assert_eq!("Moving", status.motion);
        assert_eq!("Inactive", status.gps);

        let html = status.overlay_content();
        assert!(html.contains("<dd>700070635323</dd>"));
        assert!(html.contains("<dd class=\"on\">ON</dd>"));
        assert!(html.contains("<dd>Moving</dd>"));
    }

    #[test]
    fn unknown_values() {
        let report = PositionReport::basic("<A&B>".to_string(), Point::new(1.0, 2.0), None);
        let status = present(&report);

        assert_eq!("-", status.time);
        assert_eq!("-", status.bearing);
        assert_eq!("N", status.compass);
        assert_eq!("OFF", status.ignition);
        assert_eq!("Stationary", status.motion);
        assert!(status.overlay_content().contains("&lt;A&amp;B&gt;"));
    }

    #[test]
    fn marker_colors() {
        assert_eq!("#10b981", MarkerStyle::for_ignition(true).fill_color);
        assert_eq!("#ef4444", MarkerStyle::for_ignition(false).fill_color);
    }
}
