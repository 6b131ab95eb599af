use super::*;
use roamphys_core::{iso, quat_identity, vec3, Velocity};
use roamphys_vehicles::VehicleSetup;

fn ground(world: &mut PhysicsWorld) -> BodyId {
    world.register_static(Shape::Plane, Isometry::default())
}

fn crate_box(y: f32) -> RigidBody {
    RigidBody::new(Shape::Box { hx: 0.5, hy: 0.5, hz: 0.5 }, 10.0)
        .with_pose(iso(vec3(0.0, y, 0.0), quat_identity()))
}

#[test]
fn reregistering_restores_hash() {
    let mut world = PhysicsWorld::new(WorldParams::default());
    ground(&mut world);
    let id = world.register(crate_box(3.0));
    world.advance(0.1);
    let before = world.state_hash();

    let body = world.unregister(id).unwrap();
    assert!(!world.contains(id));
    assert!(world.body(id).is_none());
    let again = world.register(body);
    assert_eq!(again.slot, id.slot);
    assert_ne!(again.generation, id.generation);
    assert_eq!(world.state_hash(), before);
}

#[test]
fn stale_handle_does_not_resolve() {
    let mut world = PhysicsWorld::new(WorldParams::default());
    let id = world.register(crate_box(1.0));
    world.unregister(id);
    assert!(world.unregister(id).is_none());
    let other = world.register(crate_box(2.0));
    assert!(world.body(id).is_none());
    assert!(world.body(other).is_some());
}

#[test]
fn static_body_never_moves() {
    let mut world = PhysicsWorld::new(WorldParams::default());
    let pose = iso(vec3(0.0, 1.0, 0.0), quat_identity());
    let wall = world.register_static(Shape::Box { hx: 2.0, hy: 1.0, hz: 2.0 }, pose);
    let mut falling = crate_box(4.0);
    falling.vel = Velocity { lin: vec3(0.0, -5.0, 0.0), ang: Vec3::ZERO };
    world.register(falling);
    for _ in 0..120 { world.advance(1.0 / 60.0); }
    assert_eq!(world.body(wall).unwrap().pose, pose);
}

#[test]
fn free_fall_follows_gravity() {
    let mut world = PhysicsWorld::new(WorldParams::default());
    let id = world.register(crate_box(100.0).with_damping(0.0, 0.0));
    let mut substeps = 0;
    for _ in 0..6 { substeps += world.advance(1.0 / 60.0).substeps; }
    assert_eq!(substeps, 6);
    let v = world.body(id).unwrap().vel.lin;
    assert!((v.y + 1.0).abs() < 1e-4, "vy = {}", v.y);
}

#[test]
fn resting_box_falls_asleep() {
    let mut world = PhysicsWorld::new(WorldParams::default());
    ground(&mut world);
    let id = world.register(crate_box(0.5));
    for _ in 0..180 { world.advance(1.0 / 60.0); }
    let b = world.body(id).unwrap();
    assert!(!b.is_awake());
    assert!((b.pose.pos.y - 0.5).abs() < 0.02, "y = {}", b.pose.pos.y);
}

#[test]
fn trigger_reports_overlap_without_pushing() {
    let mut world = PhysicsWorld::new(WorldParams { gravity: Vec3::ZERO, ..WorldParams::default() });
    let zone = world.register_trigger(Shape::Sphere { r: 2.0 }, Isometry::default());
    let mut ball = RigidBody::new(Shape::Sphere { r: 0.5 }, 1.0)
        .with_pose(iso(vec3(0.5, 0.0, 0.0), quat_identity()))
        .with_damping(0.0, 0.0);
    ball.vel.lin = vec3(1.0, 0.0, 0.0);
    let ball = world.register(ball);

    world.advance(1.0 / 60.0);
    let seen = world.overlaps();
    assert_eq!(seen.len(), 1);
    assert!(seen[0] == (zone, ball) || seen[0] == (ball, zone));
    assert!((world.body(ball).unwrap().vel.lin.x - 1.0).abs() < 1e-5);
}

#[test]
fn filtered_pair_passes_through() {
    let mut world = PhysicsWorld::new(WorldParams::default());
    world.register(RigidBody::fixed(Shape::Plane).with_filter(groups::STATIC, groups::CHASSIS));
    let id = world.register(crate_box(0.4).with_filter(groups::AVATAR, groups::ALL));
    for _ in 0..30 { world.advance(1.0 / 60.0); }
    assert!(world.body(id).unwrap().pose.pos.y < 0.0);
}

#[test]
fn raycast_respects_exclude_and_mask() {
    let mut world = PhysicsWorld::new(WorldParams::default());
    let floor = ground(&mut world);
    let lid = world.register_static(Shape::Box { hx: 1.0, hy: 0.1, hz: 1.0 }, iso(vec3(0.0, 2.0, 0.0), quat_identity()));
    let origin = vec3(0.0, 5.0, 0.0);
    let down = vec3(0.0, -1.0, 0.0);

    let hit = world.raycast(origin, down, 10.0, groups::ALL, None).unwrap();
    assert_eq!(hit.body, lid);
    assert!((hit.distance - 2.9).abs() < 1e-4);

    let hit = world.raycast(origin, down, 10.0, groups::ALL, Some(lid)).unwrap();
    assert_eq!(hit.body, floor);
    assert!((hit.point.y).abs() < 1e-4);

    assert!(world.raycast(origin, down, 10.0, groups::AVATAR, None).is_none());
    assert!(world.raycast(origin, down, 1.0, groups::ALL, None).is_none());
}

#[test]
fn frame_force_cleared_after_advance() {
    let mut world = PhysicsWorld::new(WorldParams { gravity: Vec3::ZERO, ..WorldParams::default() });
    let id = world.register(crate_box(0.0).with_damping(0.0, 0.0));
    world.body_mut(id).unwrap().apply_force(vec3(60.0, 0.0, 0.0));
    world.advance(1.0 / 60.0);
    let v1 = world.body(id).unwrap().vel.lin.x;
    assert!((v1 - 0.1).abs() < 1e-5);
    assert_eq!(world.body(id).unwrap().frame_force(), Vec3::ZERO);

    // a frame with no sub-step still drops the force
    world.body_mut(id).unwrap().apply_force(vec3(60.0, 0.0, 0.0));
    world.advance(0.001);
    world.advance(1.0 / 60.0);
    assert!((world.body(id).unwrap().vel.lin.x - v1).abs() < 1e-5);
}

#[test]
fn vehicle_settles_on_its_wheels() {
    let mut world = PhysicsWorld::new(WorldParams::default());
    ground(&mut world);
    let setup = VehicleSetup::default();
    let id = world.add_vehicle(&setup, iso(vec3(0.0, 2.0, 0.0), quat_identity())).unwrap();
    for _ in 0..240 { world.advance(1.0 / 60.0); }

    let rig = world.vehicle(id).unwrap();
    assert!(rig.wheels().iter().all(|w| w.in_contact()));
    let view = world.vehicle_view(id).unwrap();
    assert!(view.speed() < 0.5, "speed = {}", view.speed());
    let y = view.chassis.pose.pos.y;
    assert!(y > 0.3 && y < 1.5, "chassis y = {y}");
}

#[test]
fn static_chassis_rejected() {
    let mut world = PhysicsWorld::new(WorldParams::default());
    let wall = world.register_static(Shape::Plane, Isometry::default());
    let rig = VehicleRig::from_setup(wall, &VehicleSetup::default()).unwrap();
    assert_eq!(world.attach_vehicle(rig), Err(WorldError::StaticChassis(wall)));
}

#[test]
fn params_from_partial_json() {
    let p: WorldParams = serde_json::from_str(r#"{ "max_substeps": 4 }"#).unwrap();
    assert_eq!(p.max_substeps, 4);
    assert_eq!(p.solver_iterations, WorldParams::default().solver_iterations);
}
