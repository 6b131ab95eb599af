//! Callbacks the rig needs from whatever world it lives in.

use roamphys_core::types::{Isometry, Mat3, Scalar, Vec3, Velocity};
use roamphys_core::BodyId;
use roamphys_dynamics::RigidBody;

/// Snapshot of the chassis taken once per wheel step.
#[derive(Copy, Clone, Debug)]
pub struct ChassisState {
    /// Chassis pose (centre of mass).
    pub pose: Isometry,
    /// Chassis velocity.
    pub vel: Velocity,
    /// Mass in kg.
    pub mass: Scalar,
    /// 1 / mass (0 for static).
    pub inv_mass: Scalar,
    /// World inverse inertia, already masked by the angular factor.
    pub inv_inertia: Mat3,
}

impl ChassisState {
    /// Capture a body's current state.
    pub fn of(body: &RigidBody) -> Self {
        Self {
            pose: body.pose,
            vel: body.vel,
            mass: body.mass.mass,
            inv_mass: body.inv_mass(),
            inv_inertia: body.inv_inertia_world(),
        }
    }

    /// Velocity of the chassis material point at world `p`.
    #[inline]
    pub fn point_velocity(&self, p: Vec3) -> Vec3 {
        self.vel.lin + self.vel.ang.cross(p - self.pose.pos)
    }

    /// Mass seen by a force along unit `dir` applied at world `p`.
    pub fn effective_mass(&self, p: Vec3, dir: Vec3) -> Scalar {
        let rxd = (p - self.pose.pos).cross(dir);
        let k = self.inv_mass + rxd.dot(self.inv_inertia * rxd);
        if k > 0.0 { 1.0 / k } else { 0.0 }
    }
}

/// Result of a wheel ray query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceHit {
    /// World hit point.
    pub point: Vec3,
    /// Surface normal at the hit.
    pub normal: Vec3,
    /// Distance from the ray origin.
    pub distance: Scalar,
    /// Wheel-vs-surface friction from the contact-material table.
    pub friction: Scalar,
    /// Body that was hit.
    pub body: BodyId,
}

/// World-side services for `VehicleRig::step_wheels`.
pub trait WheelHost {
    /// Current chassis state.
    fn chassis(&self) -> ChassisState;
    /// Nearest surface along `dir` (unit) within `max_len`, ignoring the chassis.
    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_len: Scalar) -> Option<SurfaceHit>;
    /// Apply a force at a world point on the chassis for the current sub-step.
    fn apply_force_at(&mut self, force: Vec3, point: Vec3);
}
