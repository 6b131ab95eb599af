use roamphys_core::{iso, quat_identity, vec3};
use roamphys_dynamics::RigidBody;
use roamphys_geom::Shape;
use roamphys_vehicles::VehicleSetup;
use roamphys_world::*;

fn main() {
    let mut w = WorldBuilder::new().with_capacity(64).build();

    // Ground (static)
    w.register_static(Shape::Plane, iso(vec3(0.0, 0.0, 0.0), quat_identity()));

    // Falling box
    let b = w.register(
        RigidBody::new(Shape::Box { hx: 0.25, hy: 0.25, hz: 0.25 }, 10.0)
            .with_pose(iso(vec3(3.0, 2.0, 0.0), quat_identity())),
    );

    // Car dropped next to it
    let car = match w.add_vehicle(&VehicleSetup::default(), iso(vec3(0.0, 2.0, 0.0), quat_identity())) {
        Ok(id) => id,
        Err(e) => { eprintln!("vehicle rejected: {e}"); return; }
    };

    for step in 0..60 {
        let stats = w.advance(1.0 / 60.0);
        let hash = w.state_hash();
        let y = w.body(b).map_or(f32::NAN, |body| body.pose.pos.y);
        let wheels = w.vehicle(car).map_or(0, |rig| rig.wheels().iter().filter(|wh| wh.in_contact()).count());
        println!("step {step:02}  pairs={}  box_y={y:.3}  wheels={wheels}  hash={:02x?}", stats.pairs_tested, &hash[..4]);
    }
}
