//! livetrack - live position animation and trail engine for a tracked vehicle

mod engine;
mod error;
pub mod sources;
pub mod surface;

pub use engine::motion::{ease_in_out_cubic, MotionInterpolator, MotionState, Pose};
pub use engine::options::{BearingInterpolation, TrackerOptions};
pub use engine::presenter::{compass_label, present, MarkerStyle, PresentedStatus};
pub use engine::report::{validate, validate_value, PositionReport};
pub use engine::trail::TrailBuffer;
pub use engine::tracker::{LiveTracker, ReportOutcome, TrackerState};
pub use engine::viewport::Viewport;
pub use error::{ReportError, Result};
