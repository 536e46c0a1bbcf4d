use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use super::pick::Ray;

/// Keep the orbit away from the poles so the up vector stays defined.
const MIN_POLAR: f32 = 0.01;
const MIN_DISTANCE: f32 = 0.1;

/// Held free-fly keys, sampled once per frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CameraMovement {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
}

/// Window-space drawing area in physical pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Pixel position to normalized device coordinates (x right, y up).
    pub fn to_ndc(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            (position.x / self.width) * 2.0 - 1.0,
            -(position.y / self.height) * 2.0 + 1.0,
        )
    }

    pub fn from_ndc(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x * 0.5 + 0.5) * self.width,
            (-ndc.y * 0.5 + 0.5) * self.height,
        )
    }
}

/// Perspective camera looking from `position` at an orbit `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(Vec3::new(5.0, 5.0, 5.0), Vec3::ZERO)
    }
}

impl CameraController {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn set_pose(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    /// (forward, right, up) in world space.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward).normalize_or_zero();
        (forward, right, up)
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect.max(1e-3), self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray(&self, ndc: Vec2) -> Ray {
        Ray::from_ndc(ndc, self.view_proj())
    }

    /// Pixel position of a world point, or `None` when it lies behind the camera.
    pub fn project_to_screen(&self, point: Vec3, viewport: Viewport) -> Option<Vec2> {
        let clip = self.view_proj() * point.extend(1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(viewport.from_ndc(ndc.truncate()))
    }

    /// Rotate the position around the target. Positive yaw turns the camera
    /// to the left around world Y; positive pitch raises it.
    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        let offset = self.position - self.target;
        let radius = offset.length().max(MIN_DISTANCE);
        let azimuth = offset.x.atan2(offset.z) - yaw_delta;
        let polar = (offset.y / radius)
            .clamp(-1.0, 1.0)
            .acos()
            - pitch_delta;
        let polar = polar.clamp(MIN_POLAR, std::f32::consts::PI - MIN_POLAR);
        let (sin_polar, cos_polar) = polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();
        self.position = self.target
            + Vec3::new(
                radius * sin_polar * sin_azimuth,
                radius * cos_polar,
                radius * sin_polar * cos_azimuth,
            );
    }

    /// Slide position and target together in the view plane. `dx`/`dy` are
    /// pixel deltas; the scene follows the pointer.
    pub fn pan(&mut self, dx: f32, dy: f32, speed: f32) {
        let (_, right, up) = self.basis();
        let scale = self.distance().max(MIN_DISTANCE) * speed;
        let offset = right * (-dx * scale) + up * (dy * scale);
        self.position += offset;
        self.target += offset;
    }

    /// Multiply the distance to the target by `factor`.
    pub fn zoom(&mut self, factor: f32) {
        let offset = self.position - self.target;
        let distance = (offset.length() * factor).max(MIN_DISTANCE);
        self.position = self.target + offset.normalize_or_zero() * distance;
    }

    /// Free-fly step: forward is the view direction flattened onto the
    /// ground plane, vertical is world Y. Returns whether anything moved.
    pub fn update_movement(&mut self, input: &CameraMovement, speed: f32) -> bool {
        let mut forward = self.forward();
        forward.y = 0.0;
        let forward = forward.try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or_zero();

        let mut step = Vec3::ZERO;
        if input.move_forward {
            step += forward * speed;
        }
        if input.move_backward {
            step -= forward * speed;
        }
        if input.move_left {
            step -= right * speed;
        }
        if input.move_right {
            step += right * speed;
        }
        if input.move_up {
            step.y += speed;
        }
        if input.move_down {
            step.y -= speed;
        }

        if step == Vec3::ZERO {
            return false;
        }
        self.position += step;
        self.target += step;
        true
    }
}
