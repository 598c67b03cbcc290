//! Tracker configuration

use serde::Deserialize;

/// How the marker rotates between two headings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BearingInterpolation {
    /// Straight from the previous to the target value. Crossing north
    /// (350° to 10°) sweeps the long way round.
    Linear,
    /// Turn through the smaller angle
    ShortestPath,
}

impl Default for BearingInterpolation {
    fn default() -> Self {
        BearingInterpolation::Linear
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerOptions {
    /// Device to follow. When unset the first accepted report binds it.
    pub device: Option<String>,
    /// Max trail positions kept
    pub trail_capacity: usize,
    /// Marker animation length in milliseconds
    pub animation_duration: f64,
    pub bearing_interpolation: BearingInterpolation,
    /// Frame clock interval in milliseconds, used by the cli event loop
    pub frame_interval: u64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            device: None,
            trail_capacity: 100,
            animation_duration: 2000.0,
            bearing_interpolation: BearingInterpolation::Linear,
            frame_interval: 16,
        }
    }
}

impl TrackerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(mut self, device: &str) -> Self {
        self.device = Some(device.to_string());

        self
    }

    pub fn trail_capacity(mut self, capacity: usize) -> Self {
        self.trail_capacity = if capacity < 1 { 1 } else { capacity };

        self
    }

    pub fn animation_duration(mut self, duration: f64) -> Self {
        self.animation_duration = duration;

        self
    }

    pub fn bearing_interpolation(mut self, mode: BearingInterpolation) -> Self {
        self.bearing_interpolation = mode;

        self
    }
}

#[test]
fn parse_options() -> Result<(), String> {
    let op: TrackerOptions = serde_yaml::from_str("{}").map_err(|e| e.to_string())?;
    assert_eq!(TrackerOptions::default(), op);

    let yaml = "device: \"700070635323\"\ntrail_capacity: 20\nbearing_interpolation: shortest_path";
    let op: TrackerOptions = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;

    assert_eq!(
        TrackerOptions {
            device: Some("700070635323".to_string()),
            trail_capacity: 20,
            animation_duration: 2000.0,
            bearing_interpolation: BearingInterpolation::ShortestPath,
            frame_interval: 16,
        },
        op
    );

    Ok(())
}
