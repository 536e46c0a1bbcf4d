use glam::Vec3;
use std::collections::HashMap;

use super::{Axis, Color, EntityId};
use crate::error::{EditorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(pub u32);

impl std::fmt::Display for LightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "light#{}", self.0)
    }
}

/// Directional light; the renderer derives its direction from `position`
/// toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 10.0, 7.5),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct Lights {
    lights: Vec<(LightId, DirectionalLight)>,
    next_id: u32,
}

impl Lights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, light: DirectionalLight) -> LightId {
        let id = LightId(self.next_id);
        self.next_id += 1;
        self.lights.push((id, light));
        id
    }

    pub fn get(&self, id: LightId) -> Option<&DirectionalLight> {
        self.lights
            .iter()
            .find(|(light_id, _)| *light_id == id)
            .map(|(_, light)| light)
    }

    fn get_mut(&mut self, id: LightId) -> Result<&mut DirectionalLight> {
        self.lights
            .iter_mut()
            .find(|(light_id, _)| *light_id == id)
            .map(|(_, light)| light)
            .ok_or(EditorError::UnknownLight(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (LightId, &DirectionalLight)> + '_ {
        self.lights.iter().map(|(id, light)| (*id, light))
    }

    pub fn set_position(&mut self, id: LightId, position: Vec3) -> Result<()> {
        self.get_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_axis_position(&mut self, id: LightId, axis: Axis, value: f32) -> Result<()> {
        self.get_mut(id)?.position[axis.index()] = value;
        Ok(())
    }

    pub fn set_intensity(&mut self, id: LightId, intensity: f32) -> Result<()> {
        self.get_mut(id)?.intensity = intensity.max(0.0);
        Ok(())
    }

    pub fn set_color(&mut self, id: LightId, color: Color) -> Result<()> {
        self.get_mut(id)?.color = color;
        Ok(())
    }
}

/// Marker entity → light it drives. Consulted after every drag update;
/// the light never writes back to its marker.
#[derive(Debug, Default)]
pub struct LightBindings {
    markers: HashMap<EntityId, LightId>,
}

impl LightBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, marker: EntityId, light: LightId) {
        self.markers.insert(marker, light);
    }

    pub fn unbind(&mut self, marker: EntityId) -> Option<LightId> {
        self.markers.remove(&marker)
    }

    pub fn light_for(&self, marker: EntityId) -> Option<LightId> {
        self.markers.get(&marker).copied()
    }

    #[cfg(test)]
    pub fn is_marker(&self, entity: EntityId) -> bool {
        self.markers.contains_key(&entity)
    }

    /// Mirror the marker's position into its light, if `marker` is bound.
    pub fn sync(&self, marker: EntityId, position: Vec3, lights: &mut Lights) -> Result<bool> {
        let Some(light) = self.light_for(marker) else {
            return Ok(false);
        };
        lights.set_position(light, position)?;
        Ok(true)
    }
}
