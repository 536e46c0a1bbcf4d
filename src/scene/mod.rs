pub mod light;
pub mod texture;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::error::{EditorError, Result};
pub use light::{DirectionalLight, LightBindings, LightId, Lights};
pub use texture::TextureRef;

/// Smallest allowed scale component on any axis.
pub const MIN_SCALE: f32 = 0.1;

/// Height of a freshly added primitive's center; unit primitives rest on y = 0.
pub const DEFAULT_SPAWN_HEIGHT: f32 = 0.5;

/// `#8b4513`
pub const DEFAULT_COLOR: Color = [139.0 / 255.0, 69.0 / 255.0, 19.0 / 255.0];
/// `#ffff00`
pub const LIGHT_MARKER_COLOR: Color = [1.0, 1.0, 0.0];
pub const LIGHT_MARKER_RADIUS: f32 = 0.2;

pub type Color = [f32; 3];

pub fn rgb_from_hex(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Primitive kinds offered by the "add" buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Cube,
    Sphere,
    Cylinder,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 3] = [
        PrimitiveKind::Cube,
        PrimitiveKind::Sphere,
        PrimitiveKind::Cylinder,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            PrimitiveKind::Cube => "Cube",
            PrimitiveKind::Sphere => "Sphere",
            PrimitiveKind::Cylinder => "Cylinder",
        }
    }

    pub fn geometry(self) -> Geometry {
        match self {
            PrimitiveKind::Cube => Geometry::Box {
                size: Vec3::ONE,
            },
            PrimitiveKind::Sphere => Geometry::Sphere { radius: 0.5 },
            PrimitiveKind::Cylinder => Geometry::Cylinder {
                radius: 0.5,
                height: 1.0,
            },
        }
    }
}

/// Local-space shape, centered on the origin. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box { size: Vec3 },
    Sphere { radius: f32 },
    /// Axis along local Y.
    Cylinder { radius: f32, height: f32 },
}

impl Geometry {
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Geometry::Box { size } => size * 0.5,
            Geometry::Sphere { radius } => Vec3::splat(radius),
            Geometry::Cylinder { radius, height } => Vec3::new(radius, height * 0.5, radius),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Per-axis rotation in radians, applied X then Y then Z (intrinsic).
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        compose_transform_matrix(self.position, self.rotation, self.scale)
    }

    pub fn orientation(&self) -> Quat {
        euler_quat(self.rotation)
    }

    pub fn clamp_scale(&mut self) {
        self.scale = self.scale.max(Vec3::splat(MIN_SCALE));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub color: Color,
    pub texture: Option<TextureRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub geometry: Geometry,
    pub transform: Transform,
    pub appearance: Appearance,
}

/// Owns every manipulable entity plus the logical lights and the
/// marker → light binding table.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    entities: Vec<Entity>,
    next_id: u64,
    /// Primitives ever spawned per kind; names never repeat.
    spawned: [u32; 3],
    lights: Lights,
    bindings: LightBindings,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a primitive at the default spawn pose. Ids are never recycled.
    pub fn add(&mut self, kind: PrimitiveKind) -> EntityId {
        let spawned = &mut self.spawned[kind.index()];
        *spawned += 1;
        let name = format!("{} {}", kind.label(), spawned);
        self.insert(
            name,
            kind.geometry(),
            Transform::at(Vec3::new(0.0, DEFAULT_SPAWN_HEIGHT, 0.0)),
            DEFAULT_COLOR,
        )
    }

    /// Add a light and a draggable marker sphere bound to it.
    pub fn add_light_marker(&mut self, light: DirectionalLight) -> (EntityId, LightId) {
        let light_id = self.lights.add(light);
        let marker = self.insert(
            "Light".to_string(),
            Geometry::Sphere {
                radius: LIGHT_MARKER_RADIUS,
            },
            Transform::at(light.position),
            LIGHT_MARKER_COLOR,
        );
        self.bindings.bind(marker, light_id);
        (marker, light_id)
    }

    fn insert(
        &mut self,
        name: String,
        geometry: Geometry,
        transform: Transform,
        color: Color,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            name,
            geometry,
            transform,
            appearance: Appearance {
                color,
                texture: None,
            },
        });
        log::debug!("Added entity {} ({:?})", id, geometry);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        if let Some(light) = self.bindings.unbind(id) {
            log::debug!("Marker {} removed; {} keeps its last position", id, light);
        }
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.get_mut(id).ok_or(EditorError::UnknownEntity(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entities in insertion order. Each call starts a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut Lights {
        &mut self.lights
    }

    #[cfg(test)]
    pub fn bindings(&self) -> &LightBindings {
        &self.bindings
    }

    pub fn set_position(&mut self, id: EntityId, position: Vec3) -> Result<()> {
        self.entity_mut(id)?.transform.position = position;
        Ok(())
    }

    /// Set a position and mirror it into the bound light, if any.
    pub fn move_entity(&mut self, id: EntityId, position: Vec3) -> Result<()> {
        self.set_position(id, position)?;
        if self.bindings.sync(id, position, &mut self.lights)? {
            log::trace!("Light marker {} synced to {:?}", id, position);
        }
        Ok(())
    }

    pub fn set_color(&mut self, id: EntityId, color: Color) -> Result<()> {
        self.entity_mut(id)?.appearance.color = color;
        Ok(())
    }

    pub fn set_axis_rotation(&mut self, id: EntityId, axis: Axis, degrees: f32) -> Result<()> {
        self.entity_mut(id)?.transform.rotation[axis.index()] = degrees.to_radians();
        Ok(())
    }

    pub fn set_axis_scale(&mut self, id: EntityId, axis: Axis, value: f32) -> Result<()> {
        let transform = &mut self.entity_mut(id)?.transform;
        transform.scale[axis.index()] = if value.is_finite() { value } else { MIN_SCALE };
        transform.clamp_scale();
        Ok(())
    }

    pub fn apply_texture(&mut self, id: EntityId, texture: TextureRef) -> Result<()> {
        self.entity_mut(id)?.appearance.texture = Some(texture);
        Ok(())
    }
}

pub fn compose_transform_matrix(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, euler_quat(rotation), position)
}

fn euler_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_uses_default_pose_and_color() {
        let mut scene = SceneRegistry::new();
        let id = scene.add(PrimitiveKind::Cube);
        let entity = scene.get(id).unwrap();
        assert_eq!(entity.transform.position, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(entity.transform.scale, Vec3::ONE);
        assert_eq!(entity.appearance.color, DEFAULT_COLOR);
        assert_eq!(entity.name, "Cube 1");
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut scene = SceneRegistry::new();
        let a = scene.add(PrimitiveKind::Cube);
        let b = scene.add(PrimitiveKind::Sphere);
        assert!(scene.remove(a).is_some());
        let c = scene.add(PrimitiveKind::Cylinder);
        assert_ne!(c, a);
        assert_ne!(c, b);
        assert!(!scene.contains(a));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn names_are_not_reused_after_removal() {
        let mut scene = SceneRegistry::new();
        let first = scene.add(PrimitiveKind::Cube);
        scene.add(PrimitiveKind::Cube);
        scene.add(PrimitiveKind::Sphere);
        scene.remove(first);
        let third = scene.add(PrimitiveKind::Cube);
        assert_eq!(scene.get(third).unwrap().name, "Cube 3");
        let names: Vec<&str> = scene.iter().map(|entity| entity.name.as_str()).collect();
        assert_eq!(names, ["Cube 2", "Sphere 1", "Cube 3"]);
    }

    #[test]
    fn iteration_is_restartable() {
        let mut scene = SceneRegistry::new();
        scene.add(PrimitiveKind::Cube);
        scene.add(PrimitiveKind::Sphere);
        let first: Vec<EntityId> = scene.iter().map(|entity| entity.id).collect();
        let second: Vec<EntityId> = scene.iter().map(|entity| entity.id).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn axis_scale_is_clamped() {
        let mut scene = SceneRegistry::new();
        let id = scene.add(PrimitiveKind::Cube);
        scene.set_axis_scale(id, Axis::Y, -3.0).unwrap();
        scene.set_axis_scale(id, Axis::Z, 0.0).unwrap();
        scene.set_axis_scale(id, Axis::X, 2.5).unwrap();
        let scale = scene.get(id).unwrap().transform.scale;
        assert_eq!(scale, Vec3::new(2.5, MIN_SCALE, MIN_SCALE));
    }

    #[test]
    fn axis_rotation_is_stored_in_radians() {
        let mut scene = SceneRegistry::new();
        let id = scene.add(PrimitiveKind::Cube);
        scene.set_axis_rotation(id, Axis::Y, 90.0).unwrap();
        let rotation = scene.get(id).unwrap().transform.rotation;
        assert!((rotation.y - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(rotation.x, 0.0);
    }

    #[test]
    fn setters_report_unknown_entities() {
        let mut scene = SceneRegistry::new();
        let err = scene.set_color(EntityId(42), [1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, EditorError::UnknownEntity(EntityId(42))));
    }

    #[test]
    fn moving_marker_moves_light_but_not_the_reverse() {
        let mut scene = SceneRegistry::new();
        let (marker, light) = scene.add_light_marker(DirectionalLight::default());
        let target = Vec3::new(-1.0, 4.0, 2.0);
        scene.move_entity(marker, target).unwrap();
        assert_eq!(scene.lights().get(light).unwrap().position, target);

        scene
            .lights_mut()
            .set_axis_position(light, Axis::X, 9.0)
            .unwrap();
        assert_eq!(scene.get(marker).unwrap().transform.position, target);
    }

    #[test]
    fn removing_marker_drops_binding() {
        let mut scene = SceneRegistry::new();
        let (marker, light) = scene.add_light_marker(DirectionalLight::default());
        scene.remove(marker);
        assert!(!scene.bindings().is_marker(marker));
        assert!(scene.lights().get(light).is_some());
    }

    #[test]
    fn transform_matrix_applies_scale_then_rotation_then_translation() {
        let matrix = compose_transform_matrix(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            Vec3::new(2.0, 1.0, 1.0),
        );
        let p = matrix.transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 4.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn hex_colors_convert_to_unit_range() {
        assert_eq!(rgb_from_hex(0xffff00), LIGHT_MARKER_COLOR);
        assert_eq!(rgb_from_hex(0x8b4513), DEFAULT_COLOR);
    }
}
