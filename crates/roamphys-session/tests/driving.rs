mod common;

use common::*;
use roamphys_core::{iso, vec3, yaw_rotation, ControlSignal, Vec3};
use roamphys_session::{ModeState, RespawnReason, Session, SessionConfig, SessionEvent};

#[test]
fn two_seconds_of_throttle_moves_forward() {
    let mut s = driving_session();
    let start = s.vehicle_pose();
    let forward = start.rot * -Vec3::Z;
    let right = start.rot * Vec3::X;

    run(&mut s, 2.0, &ControlSignal { throttle: true, ..ControlSignal::default() });
    let moved = s.vehicle_pose().pos - start.pos;
    assert!(moved.dot(forward) > 1.0, "moved {moved:?}");
    assert!(moved.dot(right).abs() < 0.5, "moved {moved:?}");
}

#[test]
fn forward_cap_holds_every_frame() {
    let mut s = driving_session();
    let boost = ControlSignal { throttle: true, boost: true, ..ControlSignal::default() };
    let mut top = 0.0f32;
    for _ in 0..(12.0 / DT) as usize {
        s.frame(DT, &boost);
        let v = s.vehicle_speed();
        assert!(v <= 100.0 + 1e-3, "speed {v}");
        top = top.max(v);
    }
    assert!(top > 10.0);
}

#[test]
fn reverse_cap_holds_while_backing_up() {
    let mut s = driving_session();
    let back = ControlSignal { reverse_or_brake: true, ..ControlSignal::default() };
    for _ in 0..(10.0 / DT) as usize {
        s.frame(DT, &back);
        let pose = s.vehicle_pose();
        let vel = s.world().body(s.chassis()).unwrap().vel.lin;
        if (pose.rot * Vec3::Z).dot(vel) > 1.0 {
            assert!(vel.length() <= 30.0 + 1e-3, "reverse speed {}", vel.length());
        }
    }
}

#[test]
fn airborne_car_only_falls() {
    let mut s = Session::new(SessionConfig::default()).unwrap();
    s.start();
    let full = ControlSignal { throttle: true, boost: true, handbrake: true, steer: 1.0, ..ControlSignal::default() };
    for _ in 0..20 {
        s.frame(DT, &full);
        let rig = s.vehicle().unwrap();
        assert!(rig.wheels().iter().all(|w| !w.in_contact() && w.suspension_force == 0.0));
        let vel = s.world().body(s.chassis()).unwrap().vel;
        assert!(vel.lin.x.abs() < 1e-4 && vel.lin.z.abs() < 1e-4, "vel {:?}", vel.lin);
        assert!(vel.lin.y < 0.0);
    }
}

#[test]
fn falling_out_respawns() {
    let mut s = Session::new(SessionConfig::default()).unwrap();
    s.start();
    s.drain_events();
    run(&mut s, 2.0, &ControlSignal::default());
    let events = s.drain_events();
    assert!(events.contains(&SessionEvent::VehicleRespawned { reason: RespawnReason::FellOut }));
    assert!(s.vehicle_pose().pos.y > -5.0);
}

#[test]
fn sustained_inversion_respawns() {
    let mut s = driving_session();
    let flipped = iso(vec3(20.0, 1.0, 0.0), yaw_rotation(0.0) * roamphys_core::Quat::from_rotation_z(core::f32::consts::PI));
    let chassis = s.chassis();
    s.world_mut().body_mut(chassis).unwrap().set_pose(flipped);
    s.drain_events();

    run(&mut s, 1.0, &ControlSignal::default());
    assert!(s.drain_events().is_empty());
    run(&mut s, 1.5, &ControlSignal::default());
    assert!(s.drain_events().contains(&SessionEvent::VehicleRespawned { reason: RespawnReason::Inverted }));
    assert!((s.vehicle_pose().rot * Vec3::Y).y > 0.9);
    assert_eq!(s.current_mode(), ModeState::Driving);
}

#[test]
fn respawn_is_the_same_pose_every_time() {
    let mut s = driving_session();
    run(&mut s, 1.0, &ControlSignal { throttle: true, steer: -1.0, ..ControlSignal::default() });
    s.respawn_vehicle();
    let first = s.vehicle_pose();
    run(&mut s, 0.5, &ControlSignal { reverse_or_brake: true, ..ControlSignal::default() });
    s.respawn_vehicle();
    assert_eq!(s.vehicle_pose(), first);
    assert_eq!(s.vehicle_speed(), 0.0);
    assert_eq!(first.pos, vec3(0.0, 2.0, -10.0));
}
