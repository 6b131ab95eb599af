use glam::{Vec3A, Mat3A, Quat};
use serde::{Deserialize, Serialize};

pub type Scalar = f32;
pub type Vec3 = Vec3A;
pub type Mat3 = Mat3A;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }
#[inline] pub fn quat_identity() -> Quat { Quat::IDENTITY }
/// Rotation about world +Y.
#[inline] pub fn yaw_rotation(yaw: Scalar) -> Quat { Quat::from_rotation_y(yaw) }

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Isometry { pub pos: Vec3, pub rot: Quat }

impl Isometry {
    #[inline] pub fn transform_point(&self, p: Vec3) -> Vec3 { self.pos + self.rot * p }
    #[inline] pub fn transform_vector(&self, v: Vec3) -> Vec3 { self.rot * v }
    #[inline] pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 { self.rot.inverse() * (p - self.pos) }
    #[inline] pub fn inverse_transform_vector(&self, v: Vec3) -> Vec3 { self.rot.inverse() * v }
    /// `self * other`: `other` expressed in this frame, lifted to world.
    #[inline] pub fn compose(&self, other: &Isometry) -> Isometry {
        Isometry { pos: self.transform_point(other.pos), rot: (self.rot * other.rot).normalize() }
    }
}

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Velocity { pub lin: Vec3, pub ang: Vec3 }

/// Eye position plus look-at point, handed to whatever renders the frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPose { pub position: Vec3, pub target: Vec3 }

impl Default for CameraPose {
    fn default() -> Self { Self { position: vec3(0.0, 5.0, 10.0), target: Vec3::ZERO } }
}

impl CameraPose {
    #[inline] pub fn forward(&self) -> Vec3 { (self.target - self.position).normalize_or_zero() }
}
