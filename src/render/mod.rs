pub mod camera;
pub mod pick;

pub use camera::{CameraController, CameraMovement, Viewport};

use glam::{Mat4, Vec3};

use crate::editor::Measurement;
use crate::scene::{Color, EntityId, Geometry, TextureRef};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub items: Vec<RenderItem>,
    pub lights: Vec<LightItem>,
    pub measurement: Option<Measurement>,
}

#[derive(Debug, Clone)]
pub struct RenderItem {
    pub entity: EntityId,
    pub geometry: Geometry,
    pub model: Mat4,
    pub color: Color,
    /// Highlight accent; black when not selected.
    pub emissive: Color,
    pub texture: Option<TextureRef>,
}

#[derive(Debug, Clone, Copy)]
pub struct LightItem {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

/// Seam to the drawing backend.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);

    fn paint_overlay(
        &mut self,
        _primitives: &[egui::ClippedPrimitive],
        _textures: &egui::TexturesDelta,
        _pixels_per_point: f32,
    ) {
    }
}

/// Traces frame contents; used when no GPU backend is attached.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        self.frames += 1;
        log::trace!(
            "frame {}: {} items, {} lights, camera at {:?}",
            self.frames,
            frame.items.len(),
            frame.lights.len(),
            frame.camera_position
        );
        if let Some(label) = &frame.measurement {
            log::trace!(
                "measurement {:.2} x {:.2} x {:.2} at {:?}",
                label.width,
                label.height,
                label.depth,
                label.screen_position
            );
        }
    }

    fn paint_overlay(
        &mut self,
        primitives: &[egui::ClippedPrimitive],
        textures: &egui::TexturesDelta,
        pixels_per_point: f32,
    ) {
        log::trace!(
            "overlay: {} primitives, {} texture updates @ {:.2} ppp",
            primitives.len(),
            textures.set.len(),
            pixels_per_point
        );
    }
}
