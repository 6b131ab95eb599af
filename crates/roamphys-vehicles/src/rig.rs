//! Wheel state and the per-sub-step wheel model.

use roamphys_core::types::{Isometry, Scalar, Vec3};
use roamphys_core::{BodyId, Quat};
use roamphys_dynamics::RigidBody;
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::host::WheelHost;
use crate::setup::{VehicleSetup, WheelParams};

/// Wheels per rig.
pub const WHEEL_COUNT: usize = 4;

/// Axle a wheel sits on. Slots 0-1 are front (steered, undriven), 2-3 rear
/// (driven, unsteered).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelRole {
    /// Steerable, never driven.
    #[default]
    Front,
    /// Driven, never steered.
    Rear,
}

impl WheelRole {
    /// Role required at wheel slot `index`.
    #[inline]
    pub fn for_index(index: usize) -> Self { if index < 2 { WheelRole::Front } else { WheelRole::Rear } }
}

/// Last successful wheel ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WheelContact {
    /// World contact point.
    pub point: Vec3,
    /// Surface normal.
    pub normal: Vec3,
    /// Ray distance from the connection point.
    pub distance: Scalar,
    /// Rest length minus current suspension length (negative = extended).
    pub compression: Scalar,
    /// Wheel-vs-surface friction.
    pub friction: Scalar,
    /// Body under the wheel.
    pub body: BodyId,
}

/// One wheel: tuning, driver inputs and the latest simulation results.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WheelState {
    /// Static tuning.
    pub params: WheelParams,
    /// Steering angle (rad, + = turn toward chassis -X, i.e. left).
    pub steering: Scalar,
    /// Engine force (N) along the wheel's local +Z; negative drives toward the nose.
    pub engine_force: Scalar,
    /// Brake force bound (N).
    pub brake: Scalar,
    /// Ray hit from the latest step, `None` while airborne.
    pub contact: Option<WheelContact>,
    /// Current suspension length.
    pub suspension_length: Scalar,
    /// Suspension force applied in the latest step (N).
    pub suspension_force: Scalar,
    /// Traction force applied in the latest step (N, world).
    pub traction_force: Vec3,
    /// 1 = full grip, < 1 = traction clipped by the friction limit.
    pub grip: Scalar,
    /// Visual spin angle about the axle (rad).
    pub spin_angle: Scalar,
    /// Spin rate (rad/s).
    pub spin_rate: Scalar,
}

impl WheelState {
    fn new(params: WheelParams) -> Self {
        Self {
            params,
            steering: 0.0,
            engine_force: 0.0,
            brake: 0.0,
            contact: None,
            suspension_length: params.rest_length,
            suspension_force: 0.0,
            traction_force: Vec3::ZERO,
            grip: 1.0,
            spin_angle: 0.0,
            spin_rate: 0.0,
        }
    }

    /// Whether the latest ray found ground.
    #[inline] pub fn in_contact(&self) -> bool { self.contact.is_some() }
    /// Whether traction was clipped in the latest step.
    #[inline] pub fn skidding(&self) -> bool { self.grip < 1.0 }

    fn clear_results(&mut self) {
        self.contact = None;
        self.suspension_length = self.params.rest_length + self.params.max_travel;
        self.suspension_force = 0.0;
        self.traction_force = Vec3::ZERO;
        self.grip = 1.0;
    }
}

/// Chassis handle plus four raycast wheels.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleRig {
    chassis: BodyId,
    wheels: Vec<WheelState>,
    /// Collision mask for wheel rays.
    pub ray_mask: u32,
}

impl VehicleRig {
    /// Empty rig around an already registered chassis body.
    pub fn new(chassis: BodyId) -> Self {
        Self { chassis, wheels: Vec::with_capacity(WHEEL_COUNT), ray_mask: roamphys_core::groups::STATIC }
    }

    /// Rig with every wheel from `setup`.
    pub fn from_setup(chassis: BodyId, setup: &VehicleSetup) -> Result<Self, RigError> {
        let mut rig = Self::new(chassis);
        rig.ray_mask = setup.ray_mask;
        for w in &setup.wheels { rig.add_wheel(*w)?; }
        rig.validate()?;
        Ok(rig)
    }

    /// Append a wheel; the fifth call and any role out of FL/FR/RL/RR order fail.
    pub fn add_wheel(&mut self, params: WheelParams) -> Result<usize, RigError> {
        let index = self.wheels.len();
        if index >= WHEEL_COUNT { return Err(RigError::TooManyWheels { max: WHEEL_COUNT }); }
        let expected = WheelRole::for_index(index);
        if params.role != expected {
            return Err(RigError::RoleOrder { index, expected, found: params.role });
        }
        check_params(index, &params)?;
        self.wheels.push(WheelState::new(params));
        Ok(index)
    }

    /// Exactly four wheels present.
    pub fn validate(&self) -> Result<(), RigError> {
        if self.wheels.len() == WHEEL_COUNT { Ok(()) } else { Err(RigError::WheelCount { found: self.wheels.len() }) }
    }

    /// Chassis body handle.
    #[inline] pub fn chassis(&self) -> BodyId { self.chassis }
    /// All wheels in slot order.
    #[inline] pub fn wheels(&self) -> &[WheelState] { &self.wheels }
    /// One wheel.
    #[inline] pub fn wheel(&self, index: usize) -> Option<&WheelState> { self.wheels.get(index) }

    /// Steering angle for wheel `index`. Out-of-range indices are ignored.
    pub fn set_steering(&mut self, index: usize, angle: Scalar) {
        debug_assert!(index < self.wheels.len(), "wheel index {index} out of range");
        if let Some(w) = self.wheels.get_mut(index) { w.steering = angle; }
    }

    /// Engine force for wheel `index`. Out-of-range indices are ignored.
    pub fn set_engine_force(&mut self, index: usize, force: Scalar) {
        debug_assert!(index < self.wheels.len(), "wheel index {index} out of range");
        if let Some(w) = self.wheels.get_mut(index) { w.engine_force = force; }
    }

    /// Brake bound for wheel `index`. Out-of-range indices are ignored.
    pub fn set_brake(&mut self, index: usize, force: Scalar) {
        debug_assert!(index < self.wheels.len(), "wheel index {index} out of range");
        if let Some(w) = self.wheels.get_mut(index) { w.brake = force.max(0.0); }
    }

    /// Zero engine, brake and steering on every wheel.
    pub fn release_controls(&mut self) {
        for w in &mut self.wheels {
            w.steering = 0.0;
            w.engine_force = 0.0;
            w.brake = 0.0;
        }
    }

    /// Forget contacts and spin (used after teleporting the chassis).
    pub fn reset_wheels(&mut self) {
        for w in &mut self.wheels {
            w.clear_results();
            w.spin_rate = 0.0;
        }
    }

    /// One sub-step of the wheel model: ray, suspension, then traction.
    /// Airborne wheels contribute nothing.
    pub fn step_wheels<H: WheelHost + ?Sized>(&mut self, host: &mut H, h: Scalar) {
        debug_assert_eq!(self.wheels.len(), WHEEL_COUNT, "vehicle rig must have exactly 4 wheels");
        let cs = host.chassis();

        // Pass 1: rays + suspension.
        let mut grounded = 0usize;
        for w in &mut self.wheels {
            let p = w.params;
            let origin = cs.pose.transform_point(p.connection);
            let dir = cs.pose.transform_vector(p.direction).normalize_or_zero();
            let max_len = p.rest_length + p.max_travel + p.radius;

            let Some(hit) = host.cast_ray(origin, dir, max_len) else {
                w.clear_results();
                continue;
            };

            let length = (hit.distance - p.radius)
                .clamp(p.rest_length - p.max_travel, p.rest_length + p.max_travel);
            let compression = p.rest_length - length;

            // Steep contacts are treated as if hit head-on, with no damping term.
            let denom = hit.normal.dot(dir);
            let (clipped_inv, rel_vel) = if denom >= -0.1 {
                (10.0, 0.0)
            } else {
                let inv = -1.0 / denom;
                (inv, hit.normal.dot(cs.point_velocity(hit.point)) * inv)
            };
            let damping = if rel_vel < 0.0 { p.damping_compression } else { p.damping_relaxation };
            let force = ((p.stiffness * compression * clipped_inv - damping * rel_vel) * cs.mass)
                .clamp(0.0, p.max_suspension_force);

            host.apply_force_at(hit.normal * force, hit.point);

            w.contact = Some(WheelContact {
                point: hit.point,
                normal: hit.normal,
                distance: hit.distance,
                compression,
                friction: hit.friction,
                body: hit.body,
            });
            w.suspension_length = length;
            w.suspension_force = force;
            grounded += 1;
        }

        // Pass 2: traction, shared between grounded wheels.
        let share = grounded.max(1) as Scalar;
        for w in &mut self.wheels {
            let Some(c) = w.contact else {
                w.spin_rate *= 0.99;
                w.spin_angle += w.spin_rate * h;
                continue;
            };
            let (fwd, side) = wheel_axes(&cs.pose, w.steering, c.normal);
            let v = cs.point_velocity(c.point);
            let v_long = v.dot(fwd);
            let v_lat = v.dot(side);

            let f_lat = if h > 0.0 { -v_lat * cs.effective_mass(c.point, side) / (share * h) } else { 0.0 };
            let mut f_long = w.engine_force;
            if w.brake > 0.0 && h > 0.0 {
                let stop = -v_long * cs.effective_mass(c.point, fwd) / (share * h);
                f_long += stop.clamp(-w.brake, w.brake);
            }

            let limit = w.params.friction_slip * c.friction * w.suspension_force;
            let mag = (f_long * f_long + f_lat * f_lat).sqrt();
            let grip = if mag > limit && mag > 0.0 { limit / mag } else { 1.0 };
            let force = (fwd * f_long + side * f_lat) * grip;

            host.apply_force_at(force, c.point);
            w.traction_force = force;
            w.grip = grip;
            w.spin_rate = v_long / w.params.radius.max(1.0e-3);
            w.spin_angle += w.spin_rate * h;
        }
    }

    /// World pose of wheel `index` for the visual layer, given the chassis pose.
    pub fn wheel_transform(&self, index: usize, chassis_pose: &Isometry) -> Option<Isometry> {
        let w = self.wheels.get(index)?;
        let p = w.params;
        let local_pos = p.connection + p.direction * w.suspension_length;
        let up = -p.direction.normalize_or_zero();
        let steer = Quat::from_axis_angle(glam::Vec3::from(up), w.steering);
        let spin = Quat::from_axis_angle(glam::Vec3::from(p.axle.normalize_or_zero()), w.spin_angle);
        Some(Isometry {
            pos: chassis_pose.transform_point(local_pos),
            rot: (chassis_pose.rot * steer * spin).normalize(),
        })
    }
}

/// Rolling direction (wheel local +Z, steered) and lateral direction, both in
/// the contact plane.
fn wheel_axes(chassis: &Isometry, steering: Scalar, normal: Vec3) -> (Vec3, Vec3) {
    let local = Quat::from_rotation_y(steering) * Vec3::Z;
    let f = chassis.rot * local;
    let fwd = (f - normal * f.dot(normal)).normalize_or_zero();
    let side = normal.cross(fwd).normalize_or_zero();
    (fwd, side)
}

fn check_params(index: usize, p: &WheelParams) -> Result<(), RigError> {
    let bad = |field| Err(RigError::BadParameter { index, field });
    if !p.connection.is_finite() { return bad("connection"); }
    if !p.direction.is_finite() || p.direction.length_squared() < 1.0e-8 { return bad("direction"); }
    if !(p.radius.is_finite() && p.radius > 0.0) { return bad("radius"); }
    if !(p.rest_length.is_finite() && p.rest_length >= 0.0) { return bad("rest_length"); }
    if !(p.max_travel.is_finite() && p.max_travel >= 0.0) { return bad("max_travel"); }
    if !(p.stiffness.is_finite() && p.stiffness >= 0.0) { return bad("stiffness"); }
    if !(p.friction_slip.is_finite() && p.friction_slip >= 0.0) { return bad("friction_slip"); }
    Ok(())
}

/// Mutable access to a rig and its chassis body at once.
pub struct VehicleView<'a> {
    /// Wheel state.
    pub rig: &'a mut VehicleRig,
    /// Chassis body.
    pub chassis: &'a mut RigidBody,
}

impl VehicleView<'_> {
    /// Chassis speed.
    #[inline] pub fn speed(&self) -> Scalar { self.chassis.vel.lin.length() }

    /// Velocity along the chassis local +Z (tail direction): negative while
    /// driving nose-first, positive while reversing.
    #[inline] pub fn longitudinal_velocity(&self) -> Scalar {
        (self.chassis.pose.rot * Vec3::Z).dot(self.chassis.vel.lin)
    }
}
