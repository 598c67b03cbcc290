//! Marker motion between two reports
//!
//! A new target never queues behind the running animation: the pending frame
//! is revoked and the animation restarts from wherever the marker is drawn.
//! Only the frame handle held in `pending` may advance the animation.

use geo::geometry::Point;
use tracing::{debug, trace};

use super::options::BearingInterpolation;
use crate::surface::{FrameHandle, FrameScheduler};

/// Interpolation endpoint: position plus heading
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Point,
    /// Degrees clockwise from north
    pub bearing: f64,
}

impl Pose {
    pub fn new(position: Point, bearing: f64) -> Self {
        Self { position, bearing }
    }

    /// Pose at `t` in [0, 1] of the way to `target`. Exact at both ends.
    pub fn lerp(&self, target: &Pose, t: f64, mode: BearingInterpolation) -> Pose {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *target;
        }

        let lng = mix(self.position.x(), target.position.x(), t);
        let lat = mix(self.position.y(), target.position.y(), t);

        let bearing = match mode {
            BearingInterpolation::Linear => mix(self.bearing, target.bearing, t),
            BearingInterpolation::ShortestPath => {
                let delta = (target.bearing - self.bearing + 540.0).rem_euclid(360.0) - 180.0;
                (self.bearing + delta * t).rem_euclid(360.0)
            }
        };

        Pose::new(Point::new(lng, lat), bearing)
    }
}

fn mix(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Cubic ease-in-out over [0, 1]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionState {
    pub previous: Pose,
    pub target: Pose,
    /// Last pose handed to the surface
    pub displayed: Pose,
    /// Frame time of the first step, latched lazily
    pub started_at: Option<f64>,
    pub progress: f64,
    pub in_progress: bool,
}

pub struct MotionInterpolator {
    state: Option<MotionState>,
    pending: Option<FrameHandle>,
    duration: f64,
    mode: BearingInterpolation,
}

impl MotionInterpolator {
    /// `duration` in the same unit as the frame timestamps
    pub fn new(duration: f64, mode: BearingInterpolation) -> Self {
        Self {
            state: None,
            pending: None,
            duration,
            mode,
        }
    }

    /// First known pose: nothing to animate
    pub fn place(&mut self, pose: Pose) {
        self.state = Some(MotionState {
            previous: pose,
            target: pose,
            displayed: pose,
            started_at: None,
            progress: 1.0,
            in_progress: false,
        });
    }

    /// Restart the animation from `displayed` towards `target`
    pub fn retarget<F: FrameScheduler>(&mut self, frames: &mut F, displayed: Point, target: Pose) {
        self.cancel(frames);

        let state = match self.state.as_mut() {
            Some(state) => state,
            None => {
                self.place(target);
                return;
            }
        };

        // heading continues from where the last rotation was headed
        state.previous = Pose::new(displayed, state.target.bearing);
        state.displayed = state.previous;
        state.target = target;
        state.started_at = None;
        state.progress = 0.0;
        state.in_progress = true;

        debug!(
            "retarget from ({}, {}) to ({}, {})",
            displayed.y(),
            displayed.x(),
            target.position.y(),
            target.position.x()
        );

        self.pending = Some(frames.request_frame());
    }

    /// Accept a frame callback. False for anything but the pending handle.
    pub fn claim_frame(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            trace!("dropping stale frame {:?}", handle);
            false
        }
    }

    /// Advance to frame time `now` and return the pose to draw
    pub fn step<F: FrameScheduler>(&mut self, frames: &mut F, now: f64) -> Option<Pose> {
        let state = self.state.as_mut()?;
        if !state.in_progress {
            return None;
        }

        let start = *state.started_at.get_or_insert(now);
        let progress = if self.duration > 0.0 {
            ((now - start) / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let pose = state
            .previous
            .lerp(&state.target, ease_in_out_cubic(progress), self.mode);
        state.progress = progress;
        state.displayed = pose;

        trace!("step progress {:.3} bearing {:.1}", progress, pose.bearing);

        if progress < 1.0 {
            self.pending = Some(frames.request_frame());
        } else {
            state.previous = state.target;
            state.started_at = None;
            state.in_progress = false;
        }

        Some(pose)
    }

    /// Revoke the pending frame, if any
    pub fn cancel<F: FrameScheduler>(&mut self, frames: &mut F) {
        if let Some(handle) = self.pending.take() {
            frames.cancel_frame(handle);
        }
    }

    /// Pose at raw (not yet eased) progress of the current animation
    pub fn pose_at(&self, progress: f64) -> Option<Pose> {
        let state = self.state.as_ref()?;
        let t = ease_in_out_cubic(progress.clamp(0.0, 1.0));

        Some(state.previous.lerp(&state.target, t, self.mode))
    }

    pub fn state(&self) -> Option<&MotionState> {
        self.state.as_ref()
    }

    pub fn target(&self) -> Option<Pose> {
        self.state.as_ref().map(|s| s.target)
    }

    pub fn displayed(&self) -> Option<Pose> {
        self.state.as_ref().map(|s| s.displayed)
    }

    pub fn progress(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.progress)
    }

    pub fn is_animating(&self) -> bool {
        self.state.as_ref().map(|s| s.in_progress).unwrap_or(false)
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }
}
