use glam::{Vec2, Vec3};

use crate::render::{CameraController, Viewport};
use crate::scene::Entity;

/// Dimensions label for the selected entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Front-face area, width × height.
    pub area: f32,
    pub center: Vec3,
    /// Where to draw the label; `None` when the center is behind the camera.
    pub screen_position: Option<Vec2>,
}

impl Measurement {
    pub fn of(entity: &Entity, camera: &CameraController, viewport: Viewport) -> Self {
        let (min, max) = world_bounds(entity);
        let size = max - min;
        let center = (min + max) * 0.5;
        Self {
            width: size.x,
            height: size.y,
            depth: size.z,
            area: size.x * size.y,
            center,
            screen_position: camera.project_to_screen(center, viewport),
        }
    }

    pub fn text(&self) -> String {
        format!(
            "Measurements:\nWidth: {:.2} m\nHeight: {:.2} m\nDepth: {:.2} m\nArea: {:.2} m²",
            self.width, self.height, self.depth, self.area
        )
    }
}

/// World-space axis-aligned bounds of the transformed local box.
pub fn world_bounds(entity: &Entity) -> (Vec3, Vec3) {
    let model = entity.transform.matrix();
    let half = entity.geometry.half_extents();
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for corner in 0..8 {
        let local = Vec3::new(
            if corner & 1 == 0 { -half.x } else { half.x },
            if corner & 2 == 0 { -half.y } else { half.y },
            if corner & 4 == 0 { -half.z } else { half.z },
        );
        let world = model.transform_point3(local);
        min = min.min(world);
        max = max.max(world);
    }
    (min, max)
}
