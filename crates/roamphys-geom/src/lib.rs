pub mod aabb;
pub mod shape;
pub mod mass;
pub mod ray;

pub use aabb::Aabb;
pub use shape::{Shape, aabb_of, PLANE_EXTENT};
pub use mass::MassProps;
pub use ray::{RayHit, ray_shape};
