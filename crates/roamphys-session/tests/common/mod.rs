#![allow(dead_code)]

use roamphys_core::{ControlSignal, Quat, Vec3};
use roamphys_geom::Shape;
use roamphys_session::{Session, SessionConfig};

pub const DT: f32 = 1.0 / 60.0;

pub fn flat_session_with(config: SessionConfig) -> Session {
    let mut s = Session::new(config).unwrap();
    s.register_static_collider(Shape::Plane, Vec3::ZERO, Quat::IDENTITY);
    s
}

pub fn flat_session() -> Session { flat_session_with(SessionConfig::default()) }

/// Started session whose car has dropped onto the ground and settled.
pub fn driving_session() -> Session {
    let mut s = flat_session();
    assert!(s.start());
    run(&mut s, 1.0, &ControlSignal::default());
    s
}

pub fn run(s: &mut Session, secs: f32, signal: &ControlSignal) {
    for _ in 0..(secs / DT).round() as usize {
        s.frame(DT, signal);
    }
}

pub fn toggle() -> ControlSignal { ControlSignal { mode_toggle_edge: true, ..ControlSignal::default() } }
