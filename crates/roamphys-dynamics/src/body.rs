use roamphys_core::types::{Isometry, Mat3, Scalar, Vec3, Velocity};
use roamphys_core::{groups, Quat};
use roamphys_collision::CollisionFilter;
use roamphys_geom::{MassProps, Shape};
use roamphys_materials::MaterialId;
use serde::{Deserialize, Serialize};

/// Sleep thresholds applied by the world each sub-step.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepParams {
    /// Combined linear + angular speed under which a body counts as idle.
    pub speed_limit: Scalar,
    /// Seconds of continuous idling before the body falls asleep.
    pub time_limit: Scalar,
}

impl Default for SleepParams {
    fn default() -> Self { Self { speed_limit: 0.1, time_limit: 1.0 } }
}

/// One rigid body with a single (optionally offset) collider.
///
/// Forces come in two lifetimes: *frame* forces (`apply_force`, `apply_torque`)
/// act on every sub-step of the next `advance` and are then cleared; *step*
/// forces (`apply_step_force_at`) act on the current sub-step only.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    pub shape: Shape,
    /// Collider pose relative to the body origin.
    pub collider_offset: Isometry,
    pub material: MaterialId,
    pub mass: MassProps,
    pub pose: Isometry,
    pub vel: Velocity,
    pub linear_damping: Scalar,
    pub angular_damping: Scalar,
    /// Per world axis multiplier on angular response; (0,1,0) = yaw only.
    pub angular_factor: Vec3,
    pub filter: CollisionFilter,
    /// `false` turns the body into an overlap-only trigger.
    pub collision_response: bool,
    pub allow_sleep: bool,
    awake: bool,
    idle_time: Scalar,
    force: Vec3,
    torque: Vec3,
    step_force: Vec3,
    step_torque: Vec3,
}

impl RigidBody {
    /// Dynamic body; `mass` of 0 yields a static one.
    pub fn new(shape: Shape, mass: Scalar) -> Self {
        Self {
            shape,
            collider_offset: Isometry::default(),
            material: MaterialId::Default,
            mass: MassProps::of_shape(&shape, mass),
            pose: Isometry::default(),
            vel: Velocity::default(),
            linear_damping: 0.01,
            angular_damping: 0.01,
            angular_factor: Vec3::ONE,
            filter: CollisionFilter::new(groups::STATIC, groups::ALL),
            collision_response: true,
            allow_sleep: true,
            awake: true,
            idle_time: 0.0,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            step_force: Vec3::ZERO,
            step_torque: Vec3::ZERO,
        }
    }

    /// Static body (mass 0) in the static-world group.
    pub fn fixed(shape: Shape) -> Self { Self::new(shape, 0.0) }

    pub fn with_pose(mut self, pose: Isometry) -> Self { self.pose = pose; self }
    pub fn with_material(mut self, m: MaterialId) -> Self { self.material = m; self }
    pub fn with_filter(mut self, group: u32, mask: u32) -> Self { self.filter = CollisionFilter::new(group, mask); self }
    pub fn with_damping(mut self, linear: Scalar, angular: Scalar) -> Self {
        self.linear_damping = linear; self.angular_damping = angular; self
    }
    pub fn with_angular_factor(mut self, f: Vec3) -> Self { self.angular_factor = f; self }
    pub fn with_collider_offset(mut self, offset: Isometry) -> Self { self.collider_offset = offset; self }
    pub fn as_trigger(mut self) -> Self { self.collision_response = false; self }
    pub fn never_sleep(mut self) -> Self { self.allow_sleep = false; self }

    #[inline] pub fn is_static(&self) -> bool { self.mass.inv_mass == 0.0 }
    #[inline] pub fn inv_mass(&self) -> Scalar { self.mass.inv_mass }
    #[inline] pub fn is_awake(&self) -> bool { self.awake }
    /// Whether the integrator should move this body.
    #[inline] pub fn is_active(&self) -> bool { !self.is_static() && self.awake }

    /// World pose of the collider.
    #[inline] pub fn collider_pose(&self) -> Isometry { self.pose.compose(&self.collider_offset) }

    #[inline] pub fn up(&self) -> Vec3 { self.pose.rot * Vec3::Y }

    /// World-space inverse inertia R * I^-1 * R^T, masked by the angular factor.
    pub fn inv_inertia_world(&self) -> Mat3 {
        if self.is_static() { return Mat3::ZERO; }
        let r = Mat3::from_quat(self.pose.rot);
        let w = r * self.mass.inv_inertia * r.transpose();
        let f = Mat3::from_diagonal(glam::Vec3::from(self.angular_factor));
        f * w * f
    }

    /// Velocity of the material point currently at world position `p`.
    #[inline] pub fn point_velocity(&self, p: Vec3) -> Vec3 {
        self.vel.lin + self.vel.ang.cross(p - self.pose.pos)
    }

    /* ---------- forces ---------- */
    pub fn apply_force(&mut self, f: Vec3) {
        if self.is_static() { return; }
        self.force += f;
        self.wake_up();
    }
    pub fn apply_torque(&mut self, t: Vec3) {
        if self.is_static() { return; }
        self.torque += t;
        self.wake_up();
    }
    /// Frame force at a world point (adds the induced torque).
    pub fn apply_force_at(&mut self, f: Vec3, p: Vec3) {
        if self.is_static() { return; }
        self.force += f;
        self.torque += (p - self.pose.pos).cross(f);
        self.wake_up();
    }
    /// Sub-step force at a world point; cleared by `clear_step_forces`.
    pub fn apply_step_force_at(&mut self, f: Vec3, p: Vec3) {
        if self.is_static() { return; }
        self.step_force += f;
        self.step_torque += (p - self.pose.pos).cross(f);
    }
    #[inline] pub fn frame_force(&self) -> Vec3 { self.force }
    #[inline] pub fn frame_torque(&self) -> Vec3 { self.torque }
    #[inline] pub fn step_force(&self) -> Vec3 { self.step_force }
    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
        self.clear_step_forces();
    }
    pub fn clear_step_forces(&mut self) {
        self.step_force = Vec3::ZERO;
        self.step_torque = Vec3::ZERO;
    }

    /* ---------- impulses ---------- */
    pub fn apply_impulse_at(&mut self, j: Vec3, p: Vec3) {
        if self.is_static() { return; }
        self.vel.lin += j * self.mass.inv_mass;
        self.vel.ang += self.inv_inertia_world() * (p - self.pose.pos).cross(j);
    }

    /* ---------- state ---------- */
    pub fn set_pose(&mut self, pose: Isometry) { self.pose = pose; self.wake_up(); }
    pub fn set_velocity(&mut self, v: Velocity) { self.vel = v; self.wake_up(); }
    /// Zero velocities and pending forces.
    pub fn halt(&mut self) {
        self.vel = Velocity::default();
        self.clear_forces();
    }

    pub fn wake_up(&mut self) { self.awake = true; self.idle_time = 0.0; }
    pub fn sleep(&mut self) {
        self.awake = false;
        self.idle_time = 0.0;
        self.vel = Velocity::default();
    }

    /// Advance the idle timer; returns true if the body just fell asleep.
    pub fn update_sleep(&mut self, p: &SleepParams, h: Scalar) -> bool {
        if !self.allow_sleep || !self.is_active() { return false; }
        let speed2 = self.vel.lin.length_squared() + self.vel.ang.length_squared();
        if speed2 < p.speed_limit * p.speed_limit {
            self.idle_time += h;
            if self.idle_time >= p.time_limit {
                self.sleep();
                return true;
            }
        } else {
            self.idle_time = 0.0;
        }
        false
    }

    /* ---------- integration ---------- */
    /// Semi-implicit Euler, velocity half: gravity + forces, damping `(1-d)^h`.
    pub fn integrate_velocity(&mut self, gravity: Vec3, h: Scalar) {
        if !self.is_active() { return; }
        let f = self.force + self.step_force;
        let t = self.torque + self.step_torque;
        self.vel.lin += (gravity + f * self.mass.inv_mass) * h;
        self.vel.ang += self.inv_inertia_world() * t * h;
        self.vel.lin *= (1.0 - self.linear_damping).max(0.0).powf(h);
        self.vel.ang *= (1.0 - self.angular_damping).max(0.0).powf(h);
        self.vel.ang *= self.angular_factor;
    }

    /// Position half: translate and spin with the post-solve velocity.
    pub fn integrate_position(&mut self, h: Scalar) {
        if !self.is_active() { return; }
        self.pose.pos += self.vel.lin * h;
        let w = self.vel.ang;
        if w.length_squared() > 0.0 {
            let dq = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * self.pose.rot;
            let q = self.pose.rot;
            self.pose.rot = Quat::from_xyzw(
                q.x + 0.5 * h * dq.x,
                q.y + 0.5 * h * dq.y,
                q.z + 0.5 * h * dq.z,
                q.w + 0.5 * h * dq.w,
            ).normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamphys_core::{iso, vec3, quat_identity};

    #[test] fn static_body_ignores_forces() {
        let mut b = RigidBody::fixed(Shape::Box { hx: 1.0, hy: 1.0, hz: 1.0 });
        b.apply_force(vec3(0.0, 1000.0, 0.0));
        b.integrate_velocity(vec3(0.0, -10.0, 0.0), 1.0 / 60.0);
        b.integrate_position(1.0 / 60.0);
        assert_eq!(b.pose, Isometry::default());
        assert_eq!(b.vel, Velocity::default());
    }

    #[test] fn yaw_only_factor_blocks_roll() {
        let mut b = RigidBody::new(Shape::Box { hx: 1.0, hy: 0.25, hz: 2.0 }, 500.0)
            .with_angular_factor(vec3(0.0, 1.0, 0.0));
        b.apply_torque(vec3(1000.0, 1000.0, 1000.0));
        b.integrate_velocity(Vec3::ZERO, 1.0 / 60.0);
        assert_eq!(b.vel.ang.x, 0.0);
        assert_eq!(b.vel.ang.z, 0.0);
        assert!(b.vel.ang.y > 0.0);
    }

    #[test] fn off_centre_force_spins() {
        let mut b = RigidBody::new(Shape::Sphere { r: 1.0 }, 1.0)
            .with_pose(iso(Vec3::ZERO, quat_identity()));
        b.apply_force_at(vec3(0.0, 0.0, 1.0), vec3(1.0, 0.0, 0.0));
        assert_eq!(b.frame_torque(), vec3(0.0, -1.0, 0.0));
    }

    #[test] fn falls_asleep_when_idle() {
        let mut b = RigidBody::new(Shape::Sphere { r: 1.0 }, 1.0);
        let p = SleepParams { speed_limit: 0.1, time_limit: 0.5 };
        let mut slept = false;
        for _ in 0..40 { slept |= b.update_sleep(&p, 1.0 / 60.0); }
        assert!(slept);
        assert!(!b.is_awake());
        b.apply_force(Vec3::X);
        assert!(b.is_awake());
    }

    #[test] fn damping_decays_speed() {
        let mut b = RigidBody::new(Shape::Sphere { r: 1.0 }, 1.0).with_damping(0.5, 0.0);
        b.vel.lin = vec3(10.0, 0.0, 0.0);
        b.integrate_velocity(Vec3::ZERO, 1.0);
        assert!((b.vel.lin.x - 5.0).abs() < 1e-5);
    }
}
