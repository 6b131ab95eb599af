pub mod ids;
pub mod types;
pub mod hash;
pub mod time;
pub mod rng;
pub mod input;

pub use ids::{BodyId, VehicleId};
pub use types::{Scalar, Vec3, Mat3, Isometry, Velocity, CameraPose, vec3, iso, quat_identity, yaw_rotation};
pub use hash::{StepHasher, hash_vec3, hash_quat};
pub use time::{FixedStep, StepPlan, StepStats};
pub use rng::XorShift64;
pub use input::{ControlSignal, ControlLatch, RawControls};
pub use glam::{Quat, Vec2};

/// Collision group bits shared by every crate.
pub mod groups {
    /// Static world geometry.
    pub const STATIC: u32 = 1;
    /// Vehicle chassis.
    pub const CHASSIS: u32 = 2;
    /// Overlap-only trigger volumes.
    pub const TRIGGER: u32 = 4;
    /// On-foot avatar.
    pub const AVATAR: u32 = 8;
    /// Mask value meaning "collide with everything".
    pub const ALL: u32 = u32::MAX;
}
