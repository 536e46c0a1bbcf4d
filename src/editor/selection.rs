use crate::error::{EditorError, Result};
use crate::scene::{rgb_from_hex, Color, EntityId, SceneRegistry};

/// Emissive accent for the selected entity (`#444444`).
pub fn highlight_emissive() -> Color {
    rgb_from_hex(0x444444)
}

/// Emissive for everything else.
pub const NEUTRAL_EMISSIVE: Color = [0.0, 0.0, 0.0];

/// Single active entity. The highlight is derived from it, so at most one
/// entity can ever carry one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    selected: Option<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection and return the previous one.
    pub fn select(&mut self, id: Option<EntityId>) -> Option<EntityId> {
        let previous = std::mem::replace(&mut self.selected, id);
        if previous != id {
            log::debug!("Selection {:?} -> {:?}", previous, id);
        }
        previous
    }

    pub fn clear(&mut self) -> Option<EntityId> {
        self.select(None)
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn is_highlighted(&self, id: EntityId) -> bool {
        self.selected == Some(id)
    }

    pub fn emissive_for(&self, id: EntityId) -> Color {
        if self.is_highlighted(id) {
            highlight_emissive()
        } else {
            NEUTRAL_EMISSIVE
        }
    }

    /// Remove the selected entity from `scene` and clear the selection.
    pub fn delete_selected(&mut self, scene: &mut SceneRegistry) -> Result<EntityId> {
        let id = self.selected.ok_or(EditorError::NoTarget)?;
        self.selected = None;
        scene.remove(id).ok_or(EditorError::UnknownEntity(id))?;
        log::info!("Deleted entity {}", id);
        Ok(id)
    }
}
