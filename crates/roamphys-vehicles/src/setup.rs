//! Serializable vehicle description with the reference tuning.

use roamphys_core::types::{Isometry, Scalar, Vec3};
use roamphys_core::{groups, vec3, Quat};
use roamphys_dynamics::RigidBody;
use roamphys_geom::Shape;
use roamphys_materials::MaterialId;
use serde::{Deserialize, Serialize};

use crate::rig::WheelRole;

/// Wheel geometry plus suspension / traction tuning.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelParams {
    /// Front (steered) or rear (driven).
    pub role: WheelRole,
    /// Ray origin in chassis space.
    pub connection: Vec3,
    /// Suspension axis in chassis space (unit, usually -Y).
    pub direction: Vec3,
    /// Spin axis in chassis space.
    pub axle: Vec3,
    /// Wheel radius.
    pub radius: Scalar,
    /// Suspension length at rest.
    pub rest_length: Scalar,
    /// Spring rate per unit chassis mass.
    pub stiffness: Scalar,
    /// Damping per unit chassis mass while compressing.
    pub damping_compression: Scalar,
    /// Damping per unit chassis mass while extending.
    pub damping_relaxation: Scalar,
    /// Traction limit as a multiple of suspension force.
    pub friction_slip: Scalar,
    /// Suspension travel either side of rest.
    pub max_travel: Scalar,
    /// Upper bound on the suspension force (N).
    pub max_suspension_force: Scalar,
}

impl Default for WheelParams {
    fn default() -> Self {
        Self {
            role: WheelRole::Front,
            connection: Vec3::ZERO,
            direction: vec3(0.0, -1.0, 0.0),
            axle: vec3(-1.0, 0.0, 0.0),
            radius: 0.4,
            rest_length: 0.5,
            stiffness: 200.0,
            damping_compression: 10.0,
            damping_relaxation: 2.5,
            friction_slip: 6.0,
            max_travel: 0.3,
            max_suspension_force: 100_000.0,
        }
    }
}

impl WheelParams {
    /// Default tuning at `connection` with `role`.
    pub fn at(role: WheelRole, connection: Vec3) -> Self {
        Self { role, connection, ..Self::default() }
    }
}

/// Chassis body tuning.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChassisParams {
    /// Collider half extents.
    pub half_extents: Vec3,
    /// Mass in kg.
    pub mass: Scalar,
    /// Collider offset from the centre of mass.
    pub collider_offset: Vec3,
    /// Linear damping fraction per second.
    pub linear_damping: Scalar,
    /// Angular damping fraction per second.
    pub angular_damping: Scalar,
    /// Collision mask; the group is always `groups::CHASSIS`.
    pub mask: u32,
}

impl Default for ChassisParams {
    fn default() -> Self {
        Self {
            half_extents: vec3(1.0, 0.25, 2.0),
            mass: 500.0,
            collider_offset: vec3(0.0, 0.2, -0.5),
            linear_damping: 0.1,
            angular_damping: 0.9,
            mask: groups::STATIC | groups::TRIGGER | groups::AVATAR,
        }
    }
}

impl ChassisParams {
    /// Chassis rigid body at `pose`. Pitch and roll are removed by the angular
    /// factor, so only yaw survives integration.
    pub fn build_body(&self, pose: Isometry) -> RigidBody {
        RigidBody::new(Shape::cuboid(self.half_extents), self.mass)
            .with_pose(pose)
            .with_collider_offset(Isometry { pos: self.collider_offset, rot: Quat::IDENTITY })
            .with_damping(self.linear_damping, self.angular_damping)
            .with_angular_factor(vec3(0.0, 1.0, 0.0))
            .with_filter(groups::CHASSIS, self.mask)
            .with_material(MaterialId::Default)
            .never_sleep()
    }
}

/// Everything needed to put a vehicle in a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSetup {
    /// Chassis tuning.
    pub chassis: ChassisParams,
    /// Wheels in FL, FR, RL, RR order. The chassis nose points along local -Z.
    pub wheels: Vec<WheelParams>,
    /// Collision mask for wheel rays.
    pub ray_mask: u32,
}

impl Default for VehicleSetup {
    fn default() -> Self {
        let (track, base, y) = (1.0, 1.6, 0.0);
        Self {
            chassis: ChassisParams::default(),
            wheels: vec![
                WheelParams::at(WheelRole::Front, vec3(-track, y, -base)),
                WheelParams::at(WheelRole::Front, vec3( track, y, -base)),
                WheelParams::at(WheelRole::Rear,  vec3(-track, y,  base)),
                WheelParams::at(WheelRole::Rear,  vec3( track, y,  base)),
            ],
            ray_mask: groups::STATIC,
        }
    }
}

impl VehicleSetup {
    /// Height of the chassis origin above flat ground when the springs carry
    /// the static load.
    pub fn ride_height(&self, gravity: Scalar) -> Scalar {
        let Some(w) = self.wheels.first() else { return 0.0 };
        let n = self.wheels.len().max(1) as Scalar;
        let sag = if w.stiffness > 0.0 { gravity.abs() / (n * w.stiffness) } else { 0.0 };
        -w.connection.y + w.radius + w.rest_length - sag.min(w.max_travel)
    }
}
