//! On-foot avatar: one fixed-rotation sphere body with direct-velocity
//! locomotion and yaw/pitch look state.

use glam::Quat;
use roamphys_core::types::{CameraPose, Isometry, Scalar, Vec3};
use roamphys_core::{groups, iso, quat_identity, vec3, BodyId, ControlSignal, Vec2};
use roamphys_dynamics::RigidBody;
use roamphys_geom::Shape;
use roamphys_materials::MaterialId;
use roamphys_world::PhysicsWorld;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarParams {
    pub radius: Scalar,
    pub mass: Scalar,
    pub linear_damping: Scalar,
    pub move_speed: Scalar,
    /// Camera height above the body origin (feet).
    pub eye_height: Scalar,
    /// rad per look-delta unit
    pub look_sensitivity: Scalar,
    pub pitch_limit: Scalar,
    pub spawn: Vec3,
}

impl Default for AvatarParams {
    fn default() -> Self {
        Self {
            radius: 0.4,
            mass: 70.0,
            linear_damping: 0.9,
            move_speed: 8.0,
            eye_height: 1.6,
            look_sensitivity: 0.002,
            pitch_limit: core::f32::consts::FRAC_PI_2,
            spawn: vec3(0.0, 10.0, 0.0),
        }
    }
}

impl AvatarParams {
    /// Sphere whose bottom sits at the body origin; rotation locked.
    pub fn build_body(&self, pos: Vec3) -> RigidBody {
        RigidBody::new(Shape::Sphere { r: self.radius }, self.mass)
            .with_pose(iso(pos, quat_identity()))
            .with_collider_offset(iso(vec3(0.0, self.radius, 0.0), quat_identity()))
            .with_angular_factor(Vec3::ZERO)
            .with_damping(self.linear_damping, 0.01)
            .with_material(MaterialId::Character)
            .with_filter(groups::AVATAR, groups::ALL)
    }
}

/// Where the avatar body lives right now.
#[derive(Clone, Debug)]
enum AvatarBody {
    /// Out of the world; state frozen.
    Parked(RigidBody),
    Active(BodyId),
}

pub struct CharacterRig {
    pub params: AvatarParams,
    body: AvatarBody,
    yaw: Scalar,
    pitch: Scalar,
}

impl CharacterRig {
    pub fn new(params: AvatarParams) -> Self {
        Self { body: AvatarBody::Parked(params.build_body(params.spawn)), params, yaw: 0.0, pitch: 0.0 }
    }

    #[inline] pub fn is_active(&self) -> bool { matches!(self.body, AvatarBody::Active(_)) }
    #[inline] pub fn yaw(&self) -> Scalar { self.yaw }
    #[inline] pub fn pitch(&self) -> Scalar { self.pitch }
    pub fn set_yaw(&mut self, yaw: Scalar) { self.yaw = yaw; }

    pub fn body_id(&self) -> Option<BodyId> {
        match self.body { AvatarBody::Active(id) => Some(id), AvatarBody::Parked(_) => None }
    }

    /// Register (true) or unregister (false) the body. Velocity survives the
    /// round trip untouched.
    pub fn set_active(&mut self, world: &mut PhysicsWorld, active: bool) {
        match (&self.body, active) {
            (AvatarBody::Parked(body), true) => {
                let id = world.register(body.clone());
                trace!(%id, "avatar registered");
                self.body = AvatarBody::Active(id);
            }
            (AvatarBody::Active(id), false) => {
                let id = *id;
                let body = world.unregister(id).unwrap_or_else(|| self.params.build_body(self.params.spawn));
                trace!(%id, "avatar parked");
                self.body = AvatarBody::Parked(body);
            }
            _ => {}
        }
    }

    /// Teleport with zero velocity, active or not.
    pub fn reset_position(&mut self, world: &mut PhysicsWorld, pos: Vec3) {
        let pose = iso(pos, quat_identity());
        if let Some(body) = self.body_mut(world) {
            body.set_pose(pose);
            body.vel.lin = Vec3::ZERO;
        }
    }

    /// Direct velocity assignment on the horizontal plane from the signal's move
    /// intent, rotated by `yaw`. Vertical velocity is left to the world.
    pub fn move_with(&mut self, world: &mut PhysicsWorld, signal: &ControlSignal, yaw: Scalar) {
        let v = self.planar_velocity(signal.move_intent(), yaw);
        if let Some(body) = self.body_mut(world) {
            body.vel.lin.x = v.x;
            body.vel.lin.z = v.z;
            body.wake_up();
        }
    }

    /// `intent.x` = right, `intent.y` = forward.
    pub fn planar_velocity(&self, intent: Vec2, yaw: Scalar) -> Vec3 {
        let local = vec3(intent.x, 0.0, -intent.y);
        if local.length_squared() == 0.0 || !local.is_finite() { return Vec3::ZERO; }
        Quat::from_rotation_y(yaw) * (local.normalize() * self.params.move_speed)
    }

    /// Mouse-look: yaw unbounded, pitch clamped.
    pub fn look(&mut self, delta: Vec2) {
        if !delta.is_finite() { return; }
        let s = self.params.look_sensitivity;
        self.yaw -= delta.x * s;
        self.pitch = (self.pitch - delta.y * s).clamp(-self.params.pitch_limit, self.params.pitch_limit);
    }

    /// Body origin (feet).
    pub fn position(&self, world: &PhysicsWorld) -> Vec3 {
        self.pose(world).pos
    }

    pub fn pose(&self, world: &PhysicsWorld) -> Isometry {
        match &self.body {
            AvatarBody::Parked(body) => body.pose,
            AvatarBody::Active(id) => world.body(*id).map_or(Isometry::default(), |b| b.pose),
        }
    }

    pub fn velocity(&self, world: &PhysicsWorld) -> Vec3 {
        match &self.body {
            AvatarBody::Parked(body) => body.vel.lin,
            AvatarBody::Active(id) => world.body(*id).map_or(Vec3::ZERO, |b| b.vel.lin),
        }
    }

    /// First-person camera at eye height looking along yaw/pitch.
    pub fn eye_camera(&self, world: &PhysicsWorld) -> CameraPose {
        let eye = self.position(world) + vec3(0.0, self.params.eye_height, 0.0);
        let look = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch);
        CameraPose { position: eye, target: eye + look * -Vec3::Z }
    }

    fn body_mut<'a>(&'a mut self, world: &'a mut PhysicsWorld) -> Option<&'a mut RigidBody> {
        match &mut self.body {
            AvatarBody::Parked(body) => Some(body),
            AvatarBody::Active(id) => world.body_mut(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamphys_world::WorldParams;

    fn world() -> PhysicsWorld {
        let mut w = PhysicsWorld::new(WorldParams::default());
        w.register_static(Shape::Plane, Isometry::default());
        w
    }

    fn walk(forward: bool, right: bool) -> ControlSignal {
        ControlSignal { throttle: forward, steer: if right { 1.0 } else { 0.0 }, ..ControlSignal::default() }
    }

    #[test]
    fn activation_registers_and_parks() {
        let mut w = world();
        let mut rig = CharacterRig::new(AvatarParams::default());
        assert_eq!(w.num_bodies(), 1);
        rig.set_active(&mut w, true);
        rig.set_active(&mut w, true);
        assert_eq!(w.num_bodies(), 2);
        assert!(rig.is_active());
        rig.set_active(&mut w, false);
        assert_eq!(w.num_bodies(), 1);
        assert!(rig.body_id().is_none());
    }

    #[test]
    fn parked_body_keeps_velocity() {
        let mut w = world();
        let mut rig = CharacterRig::new(AvatarParams::default());
        rig.set_active(&mut w, true);
        rig.reset_position(&mut w, vec3(0.0, 5.0, 0.0));
        rig.move_with(&mut w, &walk(true, false), 0.0);
        w.advance(1.0 / 60.0);
        let v = rig.velocity(&w);
        let p = rig.position(&w);
        rig.set_active(&mut w, false);
        for _ in 0..30 { w.advance(1.0 / 60.0); }
        assert_eq!(rig.velocity(&w), v);
        assert_eq!(rig.position(&w), p);
    }

    #[test]
    fn moves_at_fixed_speed_along_yaw() {
        let rig = CharacterRig::new(AvatarParams::default());
        let v = rig.planar_velocity(Vec2::new(0.0, 1.0), 0.0);
        assert!((v - vec3(0.0, 0.0, -8.0)).length() < 1e-5);
        let v = rig.planar_velocity(Vec2::new(0.0, 1.0), core::f32::consts::FRAC_PI_2);
        assert!((v - vec3(-8.0, 0.0, 0.0)).length() < 1e-4);
        let v = rig.planar_velocity(Vec2::new(1.0, 1.0), 0.0);
        assert!((v.length() - 8.0).abs() < 1e-4);
        assert_eq!(rig.planar_velocity(Vec2::ZERO, 1.0), Vec3::ZERO);
    }

    #[test]
    fn move_leaves_vertical_velocity() {
        let mut w = world();
        let mut rig = CharacterRig::new(AvatarParams::default());
        rig.set_active(&mut w, true);
        rig.reset_position(&mut w, vec3(0.0, 20.0, 0.0));
        for _ in 0..10 { w.advance(1.0 / 60.0); }
        let vy = rig.velocity(&w).y;
        assert!(vy < -0.5);
        rig.move_with(&mut w, &walk(false, true), 0.0);
        let v = rig.velocity(&w);
        assert_eq!(v.y, vy);
        assert!((v.x - 8.0).abs() < 1e-5);
    }

    #[test]
    fn lands_on_ground() {
        let mut w = world();
        let mut rig = CharacterRig::new(AvatarParams::default());
        rig.set_active(&mut w, true);
        rig.reset_position(&mut w, vec3(3.0, 2.0, 0.0));
        for _ in 0..180 { w.advance(1.0 / 60.0); }
        let p = rig.position(&w);
        assert!(p.y.abs() < 0.05, "feet at {}", p.y);
        assert!((p.x - 3.0).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut rig = CharacterRig::new(AvatarParams::default());
        rig.look(Vec2::new(100.0, -10_000.0));
        assert_eq!(rig.pitch(), core::f32::consts::FRAC_PI_2);
        assert!((rig.yaw() + 0.2).abs() < 1e-6);
        let cam = rig.eye_camera(&PhysicsWorld::new(WorldParams::default()));
        assert!(cam.forward().y > 0.99);
    }
}
