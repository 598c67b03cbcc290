//! Position report definition and validation

use geo::geometry::Point;
use serde_json::{Map, Value};
use time::format_description::well_known;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::{ReportError, Result};

/// Validated version of a received position
#[derive(Clone, Debug, PartialEq)]
pub struct PositionReport {
    pub device_id: String,
    /// Device time, when the payload carried a readable one
    pub time: Option<OffsetDateTime>,
    pub latitude: f64,
    pub longitude: f64,
    /// km/h
    pub speed: f64,
    /// Degrees in [0, 360), `None` when the device did not report a heading
    pub bearing: Option<f64>,
    pub ignition_on: bool,
    pub moving: bool,
    pub gps_active: bool,
}

impl PositionReport {
    pub fn basic(device_id: String, coordinates: Point, time: Option<OffsetDateTime>) -> Self {
        Self {
            device_id,
            time,
            latitude: coordinates.y(),
            longitude: coordinates.x(),
            speed: 0.0,
            bearing: None,
            ignition_on: false,
            moving: false,
            gps_active: false,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    /// Heading to animate towards, `fallback` when none was reported
    pub fn pose_bearing(&self, fallback: f64) -> f64 {
        self.bearing.unwrap_or(fallback)
    }
}

/// Decode and validate a serialized report
pub fn validate(raw: &str) -> Result<PositionReport> {
    let value: Value = serde_json::from_str(raw)?;
    validate_value(value)
}

/// Validate an already decoded payload
pub fn validate_value(value: Value) -> Result<PositionReport> {
    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(ReportError::Decode(serde::de::Error::custom(format!(
                "expected a report object, got `{}`",
                other
            ))))
        }
    };

    let device_id = match obj.get("imei") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(id.trim().to_string()),
        Some(Value::Number(id)) if id.is_u64() || id.is_i64() => Ok(id.to_string()),
        Some(Value::String(_)) => Err(ReportError::validation("Device field is empty")),
        Some(_) => Err(ReportError::validation("Device field type not supported")),
        None => Err(ReportError::validation("Device field not found")),
    }?;

    let latitude = required_number(&obj, "latitude")?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ReportError::validation(format!(
            "Latitude {} out of range",
            latitude
        )));
    }

    let longitude = required_number(&obj, "longitude")?;
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ReportError::validation(format!(
            "Longitude {} out of range",
            longitude
        )));
    }

    let speed = optional_number(&obj, "speed")?.unwrap_or(0.0);
    if speed < 0.0 {
        return Err(ReportError::validation(format!("Negative speed {}", speed)));
    }

    let bearing = optional_number(&obj, "bearing")?.map(|b| b.rem_euclid(360.0));

    let time = match obj.get("dateTime") {
        Some(Value::String(tm)) => parse_time(tm),
        _ => None,
    };

    let status = obj.get("statusBitsdefinition").and_then(Value::as_object);
    let flag = |name: &str| {
        status
            .and_then(|s| s.get(name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    };

    Ok(PositionReport {
        device_id,
        time,
        latitude,
        longitude,
        speed,
        bearing,
        ignition_on: flag("ignitionOn"),
        moving: flag("motionState"),
        gps_active: flag("gps"),
    })
}

fn required_number(obj: &Map<String, Value>, field: &str) -> Result<f64> {
    match optional_number(obj, field)? {
        Some(n) => Ok(n),
        None => Err(ReportError::validation(format!("Field `{}` not found", field))),
    }
}

fn optional_number(obj: &Map<String, Value>, field: &str) -> Result<Option<f64>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.is_finite() => Ok(Some(f)),
            _ => Err(ReportError::validation(format!(
                "Field `{}` is not a finite number",
                field
            ))),
        },
        Some(_) => Err(ReportError::validation(format!(
            "Invalid type of `{}`",
            field
        ))),
    }
}

/// RFC 3339 first, then a bare local timestamp taken as UTC
fn parse_time(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(tm) = OffsetDateTime::parse(raw, &well_known::Rfc3339) {
        return Some(tm);
    }

    let bare = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    PrimitiveDateTime::parse(raw, bare)
        .map(|tm| tm.assume_utc())
        .ok()
}

#[cfg(test)]
pub mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::{validate, validate_value};
    use crate::error::ReportError;

    const FULL: &str = r#"{
        "imei": "700070635323",
        "dateTime": "2025-03-10T10:15:30Z",
        "latitude": 28.538536,
        "longitude": 77.198824,
        "speed": 42.5,
        "bearing": 90,
        "statusBitsdefinition": { "ignitionOn": true, "motionState": true, "gps": true },
        "odometer": 1234
    }"#;

    #[test]
    fn full_report() -> Result<(), String> {
        let report = validate(FULL).map_err(|e| e.to_string())?;

        assert_eq!("700070635323", report.device_id);
        assert_eq!(Some(datetime!(2025-03-10 10:15:30 UTC)), report.time);
        assert_eq!(28.538536, report.latitude);
        assert_eq!(77.198824, report.longitude);
        assert_eq!(42.5, report.speed);
        assert_eq!(Some(90.0), report.bearing);
        assert!(report.ignition_on);
        assert!(report.moving);
        assert!(report.gps_active);
        assert_eq!(77.198824, report.point().x());
        assert_eq!(28.538536, report.point().y());

        Ok(())
    }

    #[test]
    fn minimal_report_defaults() -> Result<(), String> {
        let report = validate(r#"{"imei": 251, "latitude": -26.31832, "longitude": -48.8702222}"#)
            .map_err(|e| e.to_string())?;

        assert_eq!("251", report.device_id);
        assert_eq!(None, report.time);
        assert_eq!(0.0, report.speed);
        assert_eq!(None, report.bearing);
        assert!(!report.ignition_on);
        assert!(!report.moving);
        assert!(!report.gps_active);
        assert_eq!(33.0, report.pose_bearing(33.0));

        Ok(())
    }

    #[test]
    fn bearing_zero_is_a_heading() -> Result<(), String> {
        let report = validate(r#"{"imei": "A", "latitude": 1, "longitude": 2, "bearing": 0}"#)
            .map_err(|e| e.to_string())?;

        assert_eq!(Some(0.0), report.bearing);
        assert_eq!(0.0, report.pose_bearing(270.0));

        Ok(())
    }

    #[test]
    fn bearing_normalized() -> Result<(), String> {
        let report = validate(r#"{"imei": "A", "latitude": 1, "longitude": 2, "bearing": 370}"#)
            .map_err(|e| e.to_string())?;
        assert_eq!(Some(10.0), report.bearing);

        let report = validate(r#"{"imei": "A", "latitude": 1, "longitude": 2, "bearing": -90}"#)
            .map_err(|e| e.to_string())?;
        assert_eq!(Some(270.0), report.bearing);

        Ok(())
    }

    #[test]
    fn bare_timestamp_taken_as_utc() -> Result<(), String> {
        let report = validate(
            r#"{"imei": "A", "latitude": 1, "longitude": 2, "dateTime": "2025-03-10T10:15:30"}"#,
        )
        .map_err(|e| e.to_string())?;
        assert_eq!(Some(datetime!(2025-03-10 10:15:30 UTC)), report.time);

        let report = validate(
            r#"{"imei": "A", "latitude": 1, "longitude": 2, "dateTime": "yesterday"}"#,
        )
        .map_err(|e| e.to_string())?;
        assert_eq!(None, report.time);

        Ok(())
    }

    #[test]
    fn undecodable_payloads() {
        assert!(matches!(validate("{not json"), Err(ReportError::Decode(_))));
        assert!(matches!(validate("[1, 2]"), Err(ReportError::Decode(_))));
        assert!(matches!(validate("\"text\""), Err(ReportError::Decode(_))));
    }

    #[test]
    fn invalid_fields() {
        let cases = vec![
            json!({ "longitude": 77.2, "imei": "A" }),
            json!({ "latitude": 28.5, "imei": "A" }),
            json!({ "latitude": "28.5", "longitude": 77.2, "imei": "A" }),
            json!({ "latitude": 28.5, "longitude": 77.2 }),
            json!({ "latitude": 28.5, "longitude": 77.2, "imei": " " }),
            json!({ "latitude": 28.5, "longitude": 77.2, "imei": true }),
            json!({ "latitude": 91.0, "longitude": 77.2, "imei": "A" }),
            json!({ "latitude": 28.5, "longitude": -180.5, "imei": "A" }),
            json!({ "latitude": 28.5, "longitude": 77.2, "imei": "A", "speed": -1 }),
            json!({ "latitude": 28.5, "longitude": 77.2, "imei": "A", "bearing": "east" }),
        ];

        for case in cases {
            let res = validate_value(case.clone());
            assert!(
                matches!(res, Err(ReportError::Validation(_))),
                "expected validation error for {}",
                case
            );
        }
    }
}
