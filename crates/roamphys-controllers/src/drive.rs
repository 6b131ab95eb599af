use roamphys_core::types::{Isometry, Scalar, Vec3, Velocity};
use roamphys_core::{iso, vec3, yaw_rotation, ControlSignal};
use roamphys_dynamics::RigidBody;
use roamphys_vehicles::{VehicleRig, VehicleView};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Control-law tuning. Forward travel is along the chassis local -Z.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveParams {
    pub engine_force: Scalar,   // full throttle, per driven wheel
    pub reverse_factor: Scalar, // reverse propulsion = engine * factor
    pub boost_factor: Scalar,   // boost adds engine * factor on top
    pub brake_force: Scalar,
    pub handbrake_factor: Scalar,
    pub max_steer: Scalar,      // rad
    pub reverse_steer_factor: Scalar,
    /// |local speed| above which the car counts as moving forward / backward.
    pub direction_threshold: Scalar,
    pub forward_speed_cap: Scalar,
    pub reverse_speed_cap: Scalar,
    /// Local speed above which the reverse cap applies.
    pub reverse_cap_threshold: Scalar,
    pub downforce_base: Scalar,
    pub downforce_per_speed: Scalar,
    pub anti_roll_strength: Scalar,
    pub respawn_floor: Scalar,
    pub respawn_position: Vec3,
    pub respawn_yaw: Scalar,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            engine_force: 6000.0,
            reverse_factor: 0.5,
            boost_factor: 5.0,
            brake_force: 150.0,
            handbrake_factor: 2.0,
            max_steer: 0.7,
            reverse_steer_factor: 0.5,
            direction_threshold: 5.0,
            forward_speed_cap: 100.0,
            reverse_speed_cap: 30.0,
            reverse_cap_threshold: 1.0,
            downforce_base: 100.0,
            downforce_per_speed: 100.0,
            anti_roll_strength: 500.0,
            respawn_floor: -5.0,
            respawn_position: vec3(0.0, 2.0, -10.0),
            respawn_yaw: core::f32::consts::PI,
        }
    }
}

impl DriveParams {
    /// Safe pose the chassis is put back to.
    pub fn respawn_pose(&self) -> Isometry { iso(self.respawn_position, yaw_rotation(self.respawn_yaw)) }
}

/// Per-wheel targets derived from one control signal.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DriveCommand {
    /// Rear wheels only; negative pushes toward the nose.
    pub engine_force: Scalar,
    /// All four wheels.
    pub brake: Scalar,
    /// Front wheels only; positive turns left.
    pub steering: Scalar,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DriveReport {
    pub command: DriveCommand,
    /// Speed after governance.
    pub speed: Scalar,
    pub local_velocity: Scalar,
    pub clamped: bool,
    pub respawned: bool,
}

/// Stateless per-frame control law for one raycast vehicle.
#[derive(Copy, Clone, Debug, Default)]
pub struct VehicleController {
    pub params: DriveParams,
}

impl VehicleController {
    pub fn new(params: DriveParams) -> Self { Self { params } }

    /// Run the whole law against a rig: speed cap, downforce, anti-roll,
    /// fall-out respawn, then wheel targets. Forces land as frame forces for
    /// the next `advance`.
    pub fn apply(&self, signal: &ControlSignal, view: &mut VehicleView<'_>) -> DriveReport {
        let p = &self.params;
        let clamped = self.govern_speed(view.chassis);
        let speed = view.chassis.vel.lin.length();

        view.chassis.apply_force(self.downforce(speed));
        view.chassis.apply_torque(self.anti_roll_torque(view.chassis.up()));

        let mut respawned = false;
        if view.chassis.pose.pos.y < p.respawn_floor {
            debug!(y = view.chassis.pose.pos.y, floor = p.respawn_floor, "chassis below floor, respawning");
            self.respawn(view.chassis, view.rig);
            respawned = true;
        }

        let local_velocity = view.longitudinal_velocity();
        let command = self.plan(signal, local_velocity);
        write_command(view.rig, &command);

        DriveReport { command, speed: view.speed(), local_velocity, clamped, respawned }
    }

    /// Pure drive-train mapping from input and local velocity (+ = reversing).
    pub fn plan(&self, signal: &ControlSignal, local_velocity: Scalar) -> DriveCommand {
        let p = &self.params;
        let moving_forward = local_velocity < -p.direction_threshold;
        let moving_backward = local_velocity > p.direction_threshold;

        let mut engine_force = 0.0;
        let mut brake = 0.0;
        if signal.throttle {
            engine_force = -p.engine_force;
        } else if signal.reverse_or_brake {
            if moving_forward {
                brake = p.brake_force;
            } else {
                engine_force = p.engine_force * p.reverse_factor;
            }
        }
        if signal.boost {
            engine_force -= p.engine_force * p.boost_factor;
        }

        let mut steering = -signal.steer_axis() * p.max_steer;
        if moving_backward {
            steering *= p.reverse_steer_factor;
        }

        if signal.handbrake {
            brake = p.brake_force * p.handbrake_factor;
        }
        DriveCommand { engine_force, brake, steering }
    }

    /// Rescale the chassis velocity onto the forward or reverse cap. Returns
    /// true if it was clamped.
    pub fn govern_speed(&self, chassis: &mut RigidBody) -> bool {
        let p = &self.params;
        let v = chassis.vel.lin;
        let speed = v.length();
        let local = (chassis.pose.rot * Vec3::Z).dot(v);
        let cap = if local > p.reverse_cap_threshold { p.reverse_speed_cap } else { p.forward_speed_cap };
        if speed > cap && speed.is_finite() {
            chassis.vel.lin = v * (cap / speed);
            return true;
        }
        false
    }

    /// Downward force for the current speed.
    #[inline]
    pub fn downforce(&self, speed: Scalar) -> Vec3 {
        vec3(0.0, -(self.params.downforce_base + self.params.downforce_per_speed * speed), 0.0)
    }

    /// `up x world_up` scaled, yaw component dropped. Zero when upright and
    /// when exactly inverted.
    pub fn anti_roll_torque(&self, up: Vec3) -> Vec3 {
        let axis = up.cross(Vec3::Y) * self.params.anti_roll_strength;
        vec3(axis.x, 0.0, axis.z)
    }

    /// Put the chassis back on the safe pose with zero motion and forget wheel
    /// contacts.
    pub fn respawn(&self, chassis: &mut RigidBody, rig: &mut VehicleRig) {
        chassis.set_pose(self.params.respawn_pose());
        chassis.set_velocity(Velocity::default());
        chassis.halt();
        rig.reset_wheels();
    }
}

fn write_command(rig: &mut VehicleRig, cmd: &DriveCommand) {
    for i in 0..2 {
        rig.set_steering(i, cmd.steering);
        rig.set_engine_force(i, 0.0);
    }
    for i in 2..4 {
        rig.set_steering(i, 0.0);
        rig.set_engine_force(i, cmd.engine_force);
    }
    for i in 0..4 {
        rig.set_brake(i, cmd.brake);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use roamphys_core::{quat_identity, BodyId, Quat};
    use roamphys_vehicles::VehicleSetup;

    fn car() -> (RigidBody, VehicleRig) {
        let setup = VehicleSetup::default();
        let body = setup.chassis.build_body(iso(vec3(0.0, 1.0, 0.0), quat_identity()));
        let rig = VehicleRig::from_setup(BodyId { slot: 0, generation: 0 }, &setup).unwrap();
        (body, rig)
    }

    fn steer(axis: f32) -> ControlSignal {
        ControlSignal { analog_steer: Some(axis), ..ControlSignal::default() }
    }

    #[test]
    fn forward_cap_rescales_velocity() {
        let ctl = VehicleController::default();
        let (mut body, _) = car();
        body.vel.lin = vec3(0.0, 0.0, -250.0);
        assert!(ctl.govern_speed(&mut body));
        assert!((body.vel.lin.length() - 100.0).abs() < 1e-3);
        assert!(body.vel.lin.z < 0.0);
    }

    #[test]
    fn reverse_cap_applies_when_backing_up() {
        let ctl = VehicleController::default();
        let (mut body, _) = car();
        body.vel.lin = vec3(3.0, 0.0, 60.0);
        assert!(ctl.govern_speed(&mut body));
        assert!((body.vel.lin.length() - 30.0).abs() < 1e-3);

        body.vel.lin = vec3(0.0, 0.0, 20.0);
        assert!(!ctl.govern_speed(&mut body));
    }

    #[test]
    fn reversing_halves_steering_exactly() {
        let ctl = VehicleController::default();
        for axis in [-1.0, -0.37, 0.5, 1.0] {
            let forward = ctl.plan(&steer(axis), 0.0).steering;
            let reverse = ctl.plan(&steer(axis), 12.0).steering;
            assert_eq!(reverse.abs(), forward.abs() * 0.5);
        }
    }

    #[test]
    fn right_steer_is_negative_angle() {
        let ctl = VehicleController::default();
        let s = ControlSignal { steer: 1.0, ..ControlSignal::default() };
        assert_eq!(ctl.plan(&s, 0.0).steering, -0.7);
    }

    #[test]
    fn smart_brake_then_reverse() {
        let ctl = VehicleController::default();
        let back = ControlSignal { reverse_or_brake: true, ..ControlSignal::default() };
        let fast = ctl.plan(&back, -20.0);
        assert_eq!(fast, DriveCommand { engine_force: 0.0, brake: 150.0, steering: 0.0 });
        let slow = ctl.plan(&back, -1.0);
        assert_eq!(slow.engine_force, 3000.0);
        assert_eq!(slow.brake, 0.0);
    }

    #[test]
    fn boost_stacks_and_handbrake_overrides() {
        let ctl = VehicleController::default();
        let s = ControlSignal { throttle: true, boost: true, handbrake: true, ..ControlSignal::default() };
        let cmd = ctl.plan(&s, -20.0);
        assert_eq!(cmd.engine_force, -36000.0);
        assert_eq!(cmd.brake, 300.0);
    }

    #[test]
    fn engine_only_on_rear_steer_only_on_front() {
        let ctl = VehicleController::default();
        let (mut body, mut rig) = car();
        let s = ControlSignal { throttle: true, steer: -1.0, ..ControlSignal::default() };
        let mut view = VehicleView { rig: &mut rig, chassis: &mut body };
        ctl.apply(&s, &mut view);
        let w = rig.wheels();
        assert_eq!((w[0].engine_force, w[1].engine_force), (0.0, 0.0));
        assert_eq!((w[2].engine_force, w[3].engine_force), (-6000.0, -6000.0));
        assert_eq!((w[0].steering, w[1].steering), (0.7, 0.7));
        assert_eq!((w[2].steering, w[3].steering), (0.0, 0.0));
    }

    #[test]
    fn apply_adds_downforce() {
        let ctl = VehicleController::default();
        let (mut body, mut rig) = car();
        body.vel.lin = vec3(0.0, 0.0, -10.0);
        let mut view = VehicleView { rig: &mut rig, chassis: &mut body };
        let report = ctl.apply(&ControlSignal::default(), &mut view);
        assert!(!report.respawned);
        assert!((body.frame_force().y + 1100.0).abs() < 1e-2);
    }

    #[test]
    fn falling_out_respawns() {
        let ctl = VehicleController::default();
        let (mut body, mut rig) = car();
        body.pose.pos.y = -6.0;
        body.vel.lin = vec3(4.0, -30.0, 1.0);
        let mut view = VehicleView { rig: &mut rig, chassis: &mut body };
        let report = ctl.apply(&ControlSignal::default(), &mut view);
        assert!(report.respawned);
        assert_eq!(body.pose.pos, vec3(0.0, 2.0, -10.0));
        assert_eq!(body.vel, Velocity::default());
    }

    #[test]
    fn anti_roll_zero_upright_and_inverted() {
        let ctl = VehicleController::default();
        assert_eq!(ctl.anti_roll_torque(Vec3::Y), Vec3::ZERO);
        assert_eq!(ctl.anti_roll_torque(-Vec3::Y), Vec3::ZERO);
    }

    proptest! {
        #[test]
        fn anti_roll_opposes_small_tilt(theta in -0.5f32..0.5, about_x in any::<bool>()) {
            prop_assume!(theta.abs() > 1e-3);
            let ctl = VehicleController::default();
            let (axis, rot) = if about_x {
                (Vec3::X, Quat::from_rotation_x(theta))
            } else {
                (Vec3::Z, Quat::from_rotation_z(theta))
            };
            let torque = ctl.anti_roll_torque(rot * Vec3::Y);
            let about = torque.dot(axis);
            prop_assert!(about * theta < 0.0);
            prop_assert_eq!(torque.y, 0.0);
        }

        #[test]
        fn respawn_is_idempotent(
            x in -500.0f32..500.0, y in -100.0f32..100.0, z in -500.0f32..500.0,
            vx in -80.0f32..80.0, vy in -80.0f32..80.0, wz in -10.0f32..10.0,
            yaw in -3.0f32..3.0, roll in -3.0f32..3.0,
        ) {
            let ctl = VehicleController::default();
            let (mut body, mut rig) = car();
            body.pose = iso(vec3(x, y, z), Quat::from_rotation_y(yaw) * Quat::from_rotation_z(roll));
            body.vel = Velocity { lin: vec3(vx, vy, 0.0), ang: vec3(0.0, 0.0, wz) };
            ctl.respawn(&mut body, &mut rig);
            let first = (body.pose, body.vel);
            ctl.respawn(&mut body, &mut rig);
            prop_assert_eq!(first, (body.pose, body.vel));
            prop_assert_eq!(body.pose, ctl.params.respawn_pose());
            prop_assert_eq!(body.vel, Velocity::default());
        }
    }
}
