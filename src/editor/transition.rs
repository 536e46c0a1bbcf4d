use glam::Vec3;
use std::time::{Duration, Instant};

/// Camera destination for a fly-to: back off from the hit point toward the
/// current camera by `standoff`.
pub fn fly_to_destination(camera_position: Vec3, hit_point: Vec3, standoff: f32) -> Vec3 {
    let back = (camera_position - hit_point)
        .try_normalize()
        .unwrap_or(Vec3::Z);
    hit_point + back * standoff
}

/// Linear fly-to of camera position and orbit target. The clock starts on
/// the first sampled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    start_position: Vec3,
    start_target: Vec3,
    pub end_position: Vec3,
    pub end_target: Vec3,
    duration: Duration,
    started: Option<Instant>,
}

/// One sampled frame of a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSample {
    pub position: Vec3,
    pub target: Vec3,
    pub t: f32,
}

impl TransitionSample {
    pub fn finished(&self) -> bool {
        self.t >= 1.0
    }
}

impl CameraTransition {
    pub fn new(
        start_position: Vec3,
        start_target: Vec3,
        end_position: Vec3,
        end_target: Vec3,
        duration: Duration,
    ) -> Self {
        Self {
            start_position,
            start_target,
            end_position,
            end_target,
            duration,
            started: None,
        }
    }

    pub fn sample(&mut self, now: Instant) -> TransitionSample {
        let started = *self.started.get_or_insert(now);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(started);
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        if t >= 1.0 {
            return TransitionSample {
                position: self.end_position,
                target: self.end_target,
                t: 1.0,
            };
        }
        TransitionSample {
            position: self.start_position.lerp(self.end_position, t),
            target: self.start_target.lerp(self.end_target, t),
            t,
        }
    }
}
