//! CPU ray picking against scene primitives.
//!
//! Each entity is tested in its own local frame: the world ray is carried
//! through the inverse model matrix, so rotation and non-uniform scale need no
//! special handling. The ray parameter survives that affine mapping, which
//! means a local hit at `t` is also the world hit at `t`.
//!
//! Two depths are supported:
//! - bounds (`recursive == false`): the local bounding box of the primitive,
//!   used for selection and dragging. Normals are the box face directions.
//! - surface (`recursive == true`): the exact primitive, used for fly-to.

use glam::{Mat3, Mat4, Vec2, Vec3};

use crate::render::camera::CameraController;
use crate::scene::{Entity, EntityId, Geometry};

const PARALLEL_EPSILON: f32 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Unproject an NDC point at the near and far planes.
    pub fn from_ndc(ndc: Vec2, view_proj: Mat4) -> Self {
        let inverse = view_proj.inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Self::new(near, far - near)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Closest surface hit of a pick query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    pub entity: EntityId,
    pub point: Vec3,
    /// World-space outward unit normal.
    pub normal: Vec3,
    pub distance: f32,
}

/// Cast a ray from `camera` through `pointer_ndc` and return the closest hit.
/// Ties keep the earlier entity.
pub fn pick<'a>(
    pointer_ndc: Vec2,
    camera: &CameraController,
    entities: impl IntoIterator<Item = &'a Entity>,
    recursive: bool,
) -> Option<FaceHit> {
    let ray = camera.ray(pointer_ndc);
    pick_ray(&ray, entities, recursive)
}

pub fn pick_ray<'a>(
    ray: &Ray,
    entities: impl IntoIterator<Item = &'a Entity>,
    recursive: bool,
) -> Option<FaceHit> {
    let mut best: Option<FaceHit> = None;
    for entity in entities {
        let Some(hit) = intersect_entity(ray, entity, recursive) else {
            continue;
        };
        if best.map_or(true, |current| hit.distance < current.distance) {
            best = Some(hit);
        }
    }
    best
}

pub fn intersect_entity(ray: &Ray, entity: &Entity, recursive: bool) -> Option<FaceHit> {
    let model = entity.transform.matrix();
    let inverse = model.inverse();
    if !inverse.is_finite() {
        return None;
    }
    let local_origin = inverse.transform_point3(ray.origin);
    let local_direction = inverse.transform_vector3(ray.direction);

    let (t, local_normal) = if recursive {
        intersect_geometry(local_origin, local_direction, &entity.geometry)?
    } else {
        intersect_box(local_origin, local_direction, entity.geometry.half_extents())?
    };

    let normal_matrix = Mat3::from_mat4(inverse).transpose();
    let normal = (normal_matrix * local_normal).try_normalize()?;
    Some(FaceHit {
        entity: entity.id,
        point: ray.at(t),
        normal,
        distance: t,
    })
}

fn intersect_geometry(origin: Vec3, direction: Vec3, geometry: &Geometry) -> Option<(f32, Vec3)> {
    match *geometry {
        Geometry::Box { size } => intersect_box(origin, direction, size * 0.5),
        Geometry::Sphere { radius } => intersect_sphere(origin, direction, radius),
        Geometry::Cylinder { radius, height } => {
            intersect_cylinder(origin, direction, radius, height * 0.5)
        }
    }
}

/// Slab test against an origin-centered box. Returns the entry face, or the
/// exit face when the origin is inside.
pub fn intersect_box(origin: Vec3, direction: Vec3, half: Vec3) -> Option<(f32, Vec3)> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut near_normal = Vec3::ZERO;
    let mut far_normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < PARALLEL_EPSILON {
            if o < -half[axis] || o > half[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let t0 = (-half[axis] - o) * inv;
        let t1 = (half[axis] - o) * inv;
        let (enter, exit) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        let mut unit = Vec3::ZERO;
        unit[axis] = d.signum();
        if enter > t_near {
            t_near = enter;
            near_normal = -unit;
        }
        if exit < t_far {
            t_far = exit;
            far_normal = unit;
        }
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        None
    } else if t_near >= 0.0 {
        Some((t_near, near_normal))
    } else {
        Some((t_far, far_normal))
    }
}

pub fn intersect_sphere(origin: Vec3, direction: Vec3, radius: f32) -> Option<(f32, Vec3)> {
    let a = direction.length_squared();
    if a < PARALLEL_EPSILON {
        return None;
    }
    let b = 2.0 * origin.dot(direction);
    let c = origin.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let t0 = (-b - root) / (2.0 * a);
    let t1 = (-b + root) / (2.0 * a);
    let t = if t0 >= 0.0 {
        t0
    } else if t1 >= 0.0 {
        t1
    } else {
        return None;
    };
    let normal = (origin + direction * t).try_normalize()?;
    Some((t, normal))
}

/// Capped cylinder along local Y.
pub fn intersect_cylinder(
    origin: Vec3,
    direction: Vec3,
    radius: f32,
    half_height: f32,
) -> Option<(f32, Vec3)> {
    let mut best: Option<(f32, Vec3)> = None;
    let mut consider = |t: f32, normal: Vec3| {
        if t >= 0.0 && best.map_or(true, |(current, _)| t < current) {
            best = Some((t, normal));
        }
    };

    let a = direction.x * direction.x + direction.z * direction.z;
    if a > PARALLEL_EPSILON {
        let b = 2.0 * (origin.x * direction.x + origin.z * direction.z);
        let c = origin.x * origin.x + origin.z * origin.z - radius * radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant >= 0.0 {
            let root = discriminant.sqrt();
            for t in [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)] {
                let p = origin + direction * t;
                if p.y.abs() <= half_height {
                    consider(t, Vec3::new(p.x, 0.0, p.z) / radius);
                }
            }
        }
    }

    if direction.y.abs() > PARALLEL_EPSILON {
        for cap in [half_height, -half_height] {
            let t = (cap - origin.y) / direction.y;
            let p = origin + direction * t;
            if p.x * p.x + p.z * p.z <= radius * radius {
                consider(t, Vec3::new(0.0, cap.signum(), 0.0));
            }
        }
    }

    best
}

/// Ray/plane intersection in front of the ray origin.
pub fn intersect_plane(ray: &Ray, plane_origin: Vec3, plane_normal: Vec3) -> Option<Vec3> {
    let denom = plane_normal.dot(ray.direction);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (plane_origin - ray.origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray.at(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PrimitiveKind, SceneRegistry};

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
    }

    #[test]
    fn box_top_face_from_above() {
        let (t, normal) = intersect_box(Vec3::new(0.2, 5.0, 0.1), Vec3::NEG_Y, Vec3::splat(0.5)).unwrap();
        assert!((t - 4.5).abs() < 1e-6);
        assert_eq!(normal, Vec3::Y);
    }

    #[test]
    fn box_miss_and_behind() {
        assert!(intersect_box(Vec3::new(2.0, 5.0, 0.0), Vec3::NEG_Y, Vec3::splat(0.5)).is_none());
        assert!(intersect_box(Vec3::new(0.0, 5.0, 0.0), Vec3::Y, Vec3::splat(0.5)).is_none());
    }

    #[test]
    fn box_from_inside_reports_exit_face() {
        let (t, normal) = intersect_box(Vec3::ZERO, Vec3::X, Vec3::splat(0.5)).unwrap();
        assert!((t - 0.5).abs() < 1e-6);
        assert_eq!(normal, Vec3::X);
    }

    #[test]
    fn sphere_hit_normal_is_radial() {
        let (t, normal) = intersect_sphere(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 0.5).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert!(close(normal, Vec3::Z));
        assert!(intersect_sphere(Vec3::new(1.0, 0.0, 5.0), Vec3::NEG_Z, 0.5).is_none());
    }

    #[test]
    fn cylinder_side_and_cap() {
        let (t, normal) =
            intersect_cylinder(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_X, 0.5, 0.5).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert!(close(normal, Vec3::X));

        let (t, normal) =
            intersect_cylinder(Vec3::new(0.1, 5.0, 0.1), Vec3::NEG_Y, 0.5, 0.5).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert_eq!(normal, Vec3::Y);

        assert!(intersect_cylinder(Vec3::new(0.49, 5.0, 0.49), Vec3::NEG_Y, 0.5, 0.5).is_none());
    }

    #[test]
    fn bounds_pick_hits_sphere_corner_but_surface_pick_does_not() {
        let mut scene = SceneRegistry::new();
        scene.add(PrimitiveKind::Sphere);
        let ray = down_ray(0.45, 0.45);
        assert!(pick_ray(&ray, scene.iter(), false).is_some());
        assert!(pick_ray(&ray, scene.iter(), true).is_none());
    }

    #[test]
    fn closest_entity_wins() {
        let mut scene = SceneRegistry::new();
        let low = scene.add(PrimitiveKind::Cube);
        let high = scene.add(PrimitiveKind::Cube);
        scene.set_position(high, Vec3::new(0.0, 3.0, 0.0)).unwrap();

        let hit = pick_ray(&down_ray(0.0, 0.0), scene.iter(), false).unwrap();
        assert_eq!(hit.entity, high);
        assert!(close(hit.point, Vec3::new(0.0, 3.5, 0.0)));

        scene.remove(high);
        let hit = pick_ray(&down_ray(0.0, 0.0), scene.iter(), false).unwrap();
        assert_eq!(hit.entity, low);
        assert!(close(hit.normal, Vec3::Y));
    }

    #[test]
    fn scaled_and_rotated_entities_report_world_normals() {
        let mut scene = SceneRegistry::new();
        let id = scene.add(PrimitiveKind::Cube);
        scene.set_axis_scale(id, crate::scene::Axis::Y, 3.0).unwrap();
        let hit = pick_ray(&down_ray(0.0, 0.0), scene.iter(), false).unwrap();
        assert!(close(hit.point, Vec3::new(0.0, 2.0, 0.0)));
        assert!(close(hit.normal, Vec3::Y));

        scene.set_axis_scale(id, crate::scene::Axis::Y, 1.0).unwrap();
        scene.set_axis_rotation(id, crate::scene::Axis::Z, 90.0).unwrap();
        let ray = Ray::new(Vec3::new(5.0, 0.5, 0.0), Vec3::NEG_X);
        let hit = pick_ray(&ray, scene.iter(), true).unwrap();
        assert!(close(hit.normal, Vec3::X));
        assert!((hit.distance - 4.5).abs() < 1e-4);
    }

    #[test]
    fn camera_pick_through_screen_center() {
        let mut scene = SceneRegistry::new();
        let id = scene.add(PrimitiveKind::Cube);
        let camera = CameraController::new(Vec3::new(0.0, 0.5, 5.0), Vec3::new(0.0, 0.5, 0.0));
        let hit = pick(Vec2::ZERO, &camera, scene.iter(), false).unwrap();
        assert_eq!(hit.entity, id);
        assert!(close(hit.normal, Vec3::Z));
        assert!(pick(Vec2::new(0.9, 0.9), &camera, scene.iter(), false).is_none());
    }

    #[test]
    fn plane_intersection_respects_direction() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let hit = intersect_plane(&ray, Vec3::ZERO, Vec3::Y).unwrap();
        assert!(close(hit, Vec3::ZERO));
        let away = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(intersect_plane(&away, Vec3::ZERO, Vec3::Y).is_none());
        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(intersect_plane(&parallel, Vec3::ZERO, Vec3::Y).is_none());
    }
}
