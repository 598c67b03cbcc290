//! Surface that records every command it receives

use geo::geometry::{Point, Rect};

use super::{FrameHandle, FrameScheduler, RenderingSurface};
use crate::{MarkerStyle, Pose};

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCommand {
    PlaceMarker {
        pose: Pose,
        style: MarkerStyle,
        title: String,
    },
    MoveMarker(Pose),
    StyleMarker(MarkerStyle),
    SetPath(Vec<Point>),
    FitBounds(Rect),
    OpenOverlay {
        content: String,
        at: Point,
    },
    UpdateOverlay(String),
    MoveOverlay(Point),
    CloseOverlay,
    RequestFrame(FrameHandle),
    CancelFrame(FrameHandle),
}

/// In-memory surface, used by the tests and the cli
#[derive(Debug)]
pub struct RecordingSurface {
    ready: bool,
    next_handle: u64,
    pending: Vec<FrameHandle>,
    marker: Option<Pose>,
    commands: Vec<SurfaceCommand>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ready: true,
            next_handle: 1,
            pending: vec![],
            marker: None,
            commands: vec![],
        }
    }

    /// Surface whose map has not loaded yet
    pub fn unavailable() -> Self {
        let mut surface = Self::new();
        surface.ready = false;

        surface
    }

    pub fn set_ready(&mut self, ready: bool) -> &mut Self {
        self.ready = ready;

        self
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Pose the marker is currently drawn with
    pub fn marker(&self) -> Option<Pose> {
        self.marker
    }

    pub fn pending_frames(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Consume the oldest requested frame, as the event loop would
    pub fn next_frame(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for RecordingSurface {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(handle);
        self.commands.push(SurfaceCommand::RequestFrame(handle));

        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
        self.commands.push(SurfaceCommand::CancelFrame(handle));
    }
}

impl RenderingSurface for RecordingSurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn place_marker(&mut self, pose: &Pose, style: &MarkerStyle, title: &str) {
        self.marker = Some(*pose);
        self.commands.push(SurfaceCommand::PlaceMarker {
            pose: *pose,
            style: style.clone(),
            title: title.to_string(),
        });
    }

    fn move_marker(&mut self, pose: &Pose) {
        self.marker = Some(*pose);
        self.commands.push(SurfaceCommand::MoveMarker(*pose));
    }

    fn style_marker(&mut self, style: &MarkerStyle) {
        self.commands.push(SurfaceCommand::StyleMarker(style.clone()));
    }

    fn marker_position(&self) -> Option<Point> {
        self.marker.map(|m| m.position)
    }

    fn set_path(&mut self, path: &[Point]) {
        self.commands.push(SurfaceCommand::SetPath(path.to_vec()));
    }

    fn fit_bounds(&mut self, bounds: Rect) {
        self.commands.push(SurfaceCommand::FitBounds(bounds));
    }

    fn open_overlay(&mut self, content: &str, at: Point) {
        self.commands.push(SurfaceCommand::OpenOverlay {
            content: content.to_string(),
            at,
        });
    }

    fn update_overlay(&mut self, content: &str) {
        self.commands
            .push(SurfaceCommand::UpdateOverlay(content.to_string()));
    }

    fn move_overlay(&mut self, at: Point) {
        self.commands.push(SurfaceCommand::MoveOverlay(at));
    }

    fn close_overlay(&mut self) {
        self.commands.push(SurfaceCommand::CloseOverlay);
    }
}

#[cfg(test)]
pub mod tests {
    use geo::geometry::Point;

    use super::{RecordingSurface, SurfaceCommand};
    use crate::surface::{FrameScheduler, RenderingSurface};
    use crate::Pose;

    #[test]
    fn frames_in_request_order() {
        let mut surface = RecordingSurface::new();

        let f1 = surface.request_frame();
        let f2 = surface.request_frame();
        let f3 = surface.request_frame();
        surface.cancel_frame(f2);

        assert_eq!(Some(f1), surface.next_frame());
        assert_eq!(Some(f3), surface.next_frame());
        assert_eq!(None, surface.next_frame());
    }

    #[test]
    fn marker_follows_moves() {
        let mut surface = RecordingSurface::new();
        assert_eq!(None, surface.marker_position());

        let pose = Pose::new(Point::new(77.2, 28.5), 45.0);
        surface.move_marker(&pose);

        assert_eq!(Some(Point::new(77.2, 28.5)), surface.marker_position());
        assert_eq!(vec![SurfaceCommand::MoveMarker(pose)], surface.take_commands());
        assert!(surface.commands().is_empty());
    }
}
