use glam::Vec2;
use std::time::{Duration, Instant};
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::editor::{EditorKey, PointerButton};

/// Pixels of trackpad scroll treated as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 50.0;

pub fn map_key(key: PhysicalKey) -> Option<EditorKey> {
    match key {
        PhysicalKey::Code(KeyCode::KeyW) => Some(EditorKey::Forward),
        PhysicalKey::Code(KeyCode::KeyS) => Some(EditorKey::Backward),
        PhysicalKey::Code(KeyCode::KeyA) => Some(EditorKey::Left),
        PhysicalKey::Code(KeyCode::KeyD) => Some(EditorKey::Right),
        PhysicalKey::Code(KeyCode::KeyQ) => Some(EditorKey::Up),
        PhysicalKey::Code(KeyCode::KeyE) => Some(EditorKey::Down),
        PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight) => {
            Some(EditorKey::Modifier)
        }
        _ => None,
    }
}

pub fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Wheel notches; positive when scrolling away from the user.
pub fn wheel_notches(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_NOTCH,
    }
}

/// Both shift keys arm molding; it stays armed while either is held.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShiftKeys {
    left: bool,
    right: bool,
}

impl ShiftKeys {
    /// Record a shift press or release. Returns the combined held state
    /// only when it changes.
    pub fn set(&mut self, key: PhysicalKey, pressed: bool) -> Option<bool> {
        let was_held = self.held();
        match key {
            PhysicalKey::Code(KeyCode::ShiftLeft) => self.left = pressed,
            PhysicalKey::Code(KeyCode::ShiftRight) => self.right = pressed,
            _ => return None,
        }
        let held = self.held();
        (held != was_held).then_some(held)
    }

    pub fn held(&self) -> bool {
        self.left || self.right
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Turns primary presses into double-clicks. Winit reports no click count,
/// so two presses close in time and space count as one double-click.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector {
    last_press: Option<(Instant, Vec2)>,
    window: Duration,
    slop_px: f32,
}

impl DoubleClickDetector {
    pub fn new(window: Duration, slop_px: f32) -> Self {
        Self {
            last_press: None,
            window,
            slop_px,
        }
    }

    /// Record a press; true when it completes a double-click.
    pub fn press(&mut self, now: Instant, position: Vec2) -> bool {
        if let Some((at, where_)) = self.last_press.take() {
            let quick = now.saturating_duration_since(at) <= self.window;
            if quick && where_.distance(position) <= self.slop_px {
                return true;
            }
        }
        self.last_press = Some((now, position));
        false
    }

    pub fn reset(&mut self) {
        self.last_press = None;
    }
}
