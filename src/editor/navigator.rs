use glam::Vec2;

use super::{EditorKey, PointerButton};
use crate::config::EditorConfig;
use crate::render::{CameraController, CameraMovement};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PointerDrag {
    button: PointerButton,
    last: Vec2,
}

/// Camera pose plus the orbit/pan drag and the held free-fly keys.
#[derive(Debug, Default, Clone)]
pub struct CameraNavigator {
    pub camera: CameraController,
    movement: CameraMovement,
    drag: Option<PointerDrag>,
}

impl CameraNavigator {
    pub fn new(camera: CameraController) -> Self {
        Self {
            camera,
            movement: CameraMovement::default(),
            drag: None,
        }
    }

    /// Track a free-fly key. Returns false for keys that do not steer.
    pub fn set_key(&mut self, key: EditorKey, pressed: bool) -> bool {
        match key {
            EditorKey::Forward => self.movement.move_forward = pressed,
            EditorKey::Backward => self.movement.move_backward = pressed,
            EditorKey::Left => self.movement.move_left = pressed,
            EditorKey::Right => self.movement.move_right = pressed,
            EditorKey::Up => self.movement.move_up = pressed,
            EditorKey::Down => self.movement.move_down = pressed,
            EditorKey::Modifier => return false,
        }
        true
    }

    pub fn release_keys(&mut self) {
        self.movement = CameraMovement::default();
    }

    pub fn fly(&mut self, config: &EditorConfig) -> bool {
        self.camera.update_movement(&self.movement, config.move_speed)
    }

    pub fn begin_drag(&mut self, button: PointerButton, position: Vec2) {
        self.drag = Some(PointerDrag {
            button,
            last: position,
        });
    }

    pub fn end_drag(&mut self, button: PointerButton) {
        if self.drag.map_or(false, |drag| drag.button == button) {
            self.drag = None;
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Primary drags orbit, the other buttons pan.
    pub fn drag_to(&mut self, position: Vec2, config: &EditorConfig) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let delta = position - drag.last;
        drag.last = position;
        if delta == Vec2::ZERO {
            return false;
        }
        match drag.button {
            PointerButton::Primary => self.camera.orbit(
                delta.x * config.orbit_speed,
                delta.y * config.orbit_speed,
            ),
            PointerButton::Secondary | PointerButton::Middle => {
                self.camera.pan(delta.x, delta.y, config.pan_speed)
            }
        }
        true
    }

    /// Positive `notches` zoom in.
    pub fn zoom(&mut self, notches: f32, config: &EditorConfig) {
        if notches != 0.0 {
            self.camera.zoom(config.zoom_step.powf(notches));
        }
    }
}
