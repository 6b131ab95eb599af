use roamphys_core::{iso, quat_identity, vec3, Isometry};
use roamphys_dynamics::RigidBody;
use roamphys_geom::Shape;
use roamphys_world::{PhysicsWorld, WorldParams};

fn scene() -> (PhysicsWorld, roamphys_core::BodyId) {
    let mut w = PhysicsWorld::new(WorldParams::default());
    w.register_static(Shape::Plane, Isometry::default());
    let id = w.register(
        RigidBody::new(Shape::Box { hx: 0.5, hy: 0.5, hz: 0.5 }, 20.0)
            .with_pose(iso(vec3(0.0, 4.0, 0.0), quat_identity())),
    );
    (w, id)
}

#[test]
fn unregister_reregister_matches_untouched_world() {
    let (mut kept, _) = scene();
    let (mut cycled, id) = scene();
    for _ in 0..20 {
        kept.advance(1.0 / 60.0);
        cycled.advance(1.0 / 60.0);
    }

    let body = cycled.unregister(id).unwrap();
    assert_eq!(cycled.num_bodies(), 1);
    cycled.register(body);

    for _ in 0..120 {
        kept.advance(1.0 / 60.0);
        cycled.advance(1.0 / 60.0);
    }
    assert_eq!(kept.state_hash(), cycled.state_hash());
}

#[test]
fn removed_body_does_not_integrate() {
    let (mut w, id) = scene();
    let body = w.unregister(id).unwrap();
    w.advance(0.1);
    let again = w.register(body.clone());
    assert_eq!(w.body(again).unwrap().pose, body.pose);
    assert_eq!(w.body(again).unwrap().vel, body.vel);
}
