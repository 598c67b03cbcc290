//! Rendering surface API
//!
//! The map widget lives outside this crate. The engine only issues commands
//! through these traits and asks for the marker's displayed position when it
//! restarts an animation.

use geo::geometry::{Point, Rect};

use crate::{MarkerStyle, Pose};

mod recording;

pub use recording::{RecordingSurface, SurfaceCommand};

/// Token for one requested animation frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Frame callback primitive of the host event loop
pub trait FrameScheduler {
    /// Ask for one callback on the next frame boundary
    fn request_frame(&mut self) -> FrameHandle;

    /// Revoke a requested callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Map drawing surface
pub trait RenderingSurface: FrameScheduler {
    /// False until the map finished loading
    fn is_ready(&self) -> bool {
        true
    }

    fn place_marker(&mut self, pose: &Pose, style: &MarkerStyle, title: &str);

    fn move_marker(&mut self, pose: &Pose);

    fn style_marker(&mut self, style: &MarkerStyle);

    /// Where the marker is drawn right now
    fn marker_position(&self) -> Option<Point>;

    /// Replace the trail polyline
    fn set_path(&mut self, path: &[Point]);

    fn fit_bounds(&mut self, bounds: Rect);

    fn open_overlay(&mut self, content: &str, at: Point);

    fn update_overlay(&mut self, content: &str);

    fn move_overlay(&mut self, at: Point);

    fn close_overlay(&mut self);
}
