use roamphys_core::types::{Isometry, Vec3, Mat3};
use serde::{Deserialize, Serialize};
use crate::aabb::Aabb;

/// Half-size of the box used to stand in for an infinite plane in the broad phase.
pub const PLANE_EXTENT: f32 = 1.0e6;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Sphere { r: f32 },
    Box { hx: f32, hy: f32, hz: f32 },
    /// Infinite half-space whose surface passes through the pose origin, normal = local +Y.
    Plane,
}

impl Shape {
    #[inline] pub fn cuboid(he: Vec3) -> Self { Shape::Box { hx: he.x, hy: he.y, hz: he.z } }
    #[inline] pub fn half_extents(&self) -> Option<Vec3> {
        match *self { Shape::Box { hx, hy, hz } => Some(Vec3::new(hx, hy, hz)), _ => None }
    }
    /// Bounding radius about the shape origin; planes report infinity.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Sphere { r } => r,
            Shape::Box { hx, hy, hz } => Vec3::new(hx, hy, hz).length(),
            Shape::Plane => f32::INFINITY,
        }
    }
}

#[inline]
pub fn aabb_of(shape: &Shape, xf: &Isometry) -> Aabb {
    match *shape {
        Shape::Sphere { r } => Aabb::from_center_half_extents(xf.pos, Vec3::splat(r)),
        Shape::Box { hx, hy, hz } => {
            let he = Vec3::new(hx, hy, hz);
            let rot = Mat3::from_quat(xf.rot);
            let m = Mat3::from_cols(rot.x_axis.abs(), rot.y_axis.abs(), rot.z_axis.abs());
            Aabb::from_center_half_extents(xf.pos, m * he)
        }
        Shape::Plane => Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(PLANE_EXTENT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamphys_core::{iso, vec3, yaw_rotation};

    #[test] fn rotated_box_aabb_grows() {
        let s = Shape::Box { hx: 1.0, hy: 0.5, hz: 2.0 };
        let a = aabb_of(&s, &iso(Vec3::ZERO, yaw_rotation(core::f32::consts::FRAC_PI_2)));
        assert!((a.max.x - 2.0).abs() < 1e-5);
        assert!((a.max.z - 1.0).abs() < 1e-5);
    }

    #[test] fn sphere_aabb_follows_pose() {
        let a = aabb_of(&Shape::Sphere { r: 0.5 }, &iso(vec3(1.0, 2.0, 3.0), glam::Quat::IDENTITY));
        assert_eq!(a.min, vec3(0.5, 1.5, 2.5));
    }
}
