use glam::Vec3;

use crate::render::pick::{intersect_plane, FaceHit, Ray};
use crate::scene::{Axis, EntityId, Transform};

/// A normal component above this picks the molding axis.
pub const AXIS_ALIGNMENT_THRESHOLD: f32 = 0.9;

/// Drag-to-move on a camera-facing plane through the grab point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub entity: EntityId,
    plane_origin: Vec3,
    plane_normal: Vec3,
    /// Entity position minus grab point.
    grab_offset: Vec3,
}

impl DragGesture {
    pub fn begin(hit: &FaceHit, entity_position: Vec3, camera_forward: Vec3) -> Self {
        Self {
            entity: hit.entity,
            plane_origin: hit.point,
            plane_normal: camera_forward,
            grab_offset: entity_position - hit.point,
        }
    }

    /// New entity position for a pointer ray, if the ray meets the plane.
    pub fn target(&self, ray: &Ray) -> Option<Vec3> {
        intersect_plane(ray, self.plane_origin, self.plane_normal)
            .map(|point| point + self.grab_offset)
    }
}

/// Face-normal deformation driven by vertical pointer motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoldGesture {
    pub entity: EntityId,
    /// World-space face normal.
    pub normal: Vec3,
    /// Local scale axis the face belongs to.
    pub axis: Axis,
    last_y: f32,
}

impl MoldGesture {
    /// Capture a face of an entity with the given transform. The axis is
    /// chosen in the entity's local frame since scale is applied there.
    /// `None` when no local axis dominates the normal.
    pub fn begin(
        entity: EntityId,
        transform: &Transform,
        normal: Vec3,
        pointer_y: f32,
    ) -> Option<Self> {
        let local_normal = transform.orientation().inverse() * normal;
        let axis = dominant_axis(local_normal)?;
        Some(Self {
            entity,
            normal,
            axis,
            last_y: pointer_y,
        })
    }

    /// Apply one pointer sample. Moving the pointer up (smaller y) grows the
    /// entity out of the captured face; the opposite face stays put. The
    /// offset follows the world normal.
    pub fn update(&mut self, transform: &mut Transform, pointer_y: f32, sensitivity: f32) -> f32 {
        let delta_y = pointer_y - self.last_y;
        self.last_y = pointer_y;
        let amount = delta_y * -sensitivity;

        transform.scale[self.axis.index()] += amount;
        transform.clamp_scale();
        transform.position += self.normal * (amount * 0.5);
        amount
    }
}

/// The axis whose absolute component exceeds the alignment threshold.
pub fn dominant_axis(normal: Vec3) -> Option<Axis> {
    Axis::ALL
        .into_iter()
        .find(|axis| normal[axis.index()].abs() > AXIS_ALIGNMENT_THRESHOLD)
}
