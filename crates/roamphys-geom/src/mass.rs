use roamphys_core::types::{Mat3, Vec3};
use crate::shape::Shape;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MassProps {
    pub mass: f32,
    pub inv_mass: f32,
    /// Local-space inverse inertia tensor.
    pub inv_inertia: Mat3,
}

impl MassProps {
    /// Static / kinematic: never moves under force.
    pub fn infinite() -> Self {
        Self { mass: 0.0, inv_mass: 0.0, inv_inertia: Mat3::ZERO }
    }

    pub fn solid_sphere(radius: f32, mass: f32) -> Self {
        if mass <= 0.0 { return Self::infinite(); }
        let ii = 0.4 * mass * radius * radius;
        Self { mass, inv_mass: 1.0 / mass, inv_inertia: inv_diag(Vec3::splat(ii)) }
    }

    pub fn solid_box(half: Vec3, mass: f32) -> Self {
        if mass <= 0.0 { return Self::infinite(); }
        let d = half * 2.0;
        let (x2, y2, z2) = (d.x * d.x, d.y * d.y, d.z * d.z);
        let i = Vec3::new(y2 + z2, x2 + z2, x2 + y2) * (mass / 12.0);
        Self { mass, inv_mass: 1.0 / mass, inv_inertia: inv_diag(i) }
    }

    /// Mass properties for `shape` carrying `mass` (0 = static). Planes are always static.
    pub fn of_shape(shape: &Shape, mass: f32) -> Self {
        match *shape {
            Shape::Sphere { r } => Self::solid_sphere(r, mass),
            Shape::Box { hx, hy, hz } => Self::solid_box(Vec3::new(hx, hy, hz), mass),
            Shape::Plane => Self::infinite(),
        }
    }

    #[inline] pub fn is_static(&self) -> bool { self.inv_mass == 0.0 }
}

fn inv_diag(i: Vec3) -> Mat3 {
    let inv = |x: f32| if x > 0.0 { 1.0 / x } else { 0.0 };
    Mat3::from_diagonal(glam::Vec3::new(inv(i.x), inv(i.y), inv(i.z)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn zero_mass_is_static() {
        let m = MassProps::of_shape(&Shape::Box { hx: 1.0, hy: 1.0, hz: 1.0 }, 0.0);
        assert!(m.is_static());
        assert_eq!(m.inv_inertia, Mat3::ZERO);
    }

    #[test] fn box_inertia_axes() {
        let m = MassProps::solid_box(Vec3::new(1.0, 0.25, 2.0), 500.0);
        // yaw inertia (about Y) = m/12 * (4 + 16)
        let iy = 1.0 / m.inv_inertia.y_axis.y;
        assert!((iy - 500.0 * 20.0 / 12.0).abs() < 1e-2);
    }
}
