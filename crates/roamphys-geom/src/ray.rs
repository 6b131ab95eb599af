use roamphys_core::types::{Isometry, Vec3};
use crate::shape::Shape;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the (unit) ray direction.
    pub toi: f32,
    /// World-space surface normal at the hit, facing the ray origin.
    pub normal: Vec3,
}

/// Cast a ray against one posed shape. `dir` must be unit length.
/// Rays starting inside a solid report no hit; planes are one-sided.
pub fn ray_shape(shape: &Shape, xf: &Isometry, origin: Vec3, dir: Vec3, max_toi: f32) -> Option<RayHit> {
    let hit = match *shape {
        Shape::Plane => ray_plane(xf, origin, dir),
        Shape::Sphere { r } => ray_sphere(xf.pos, r, origin, dir),
        Shape::Box { hx, hy, hz } => ray_box(xf, Vec3::new(hx, hy, hz), origin, dir),
    }?;
    (hit.toi <= max_toi).then_some(hit)
}

fn ray_plane(xf: &Isometry, origin: Vec3, dir: Vec3) -> Option<RayHit> {
    let n = xf.rot * Vec3::Y;
    let denom = dir.dot(n);
    if denom >= -1.0e-8 { return None; }
    let toi = (xf.pos - origin).dot(n) / denom;
    if toi < 0.0 { return None; }
    Some(RayHit { toi, normal: n })
}

fn ray_sphere(c: Vec3, r: f32, origin: Vec3, dir: Vec3) -> Option<RayHit> {
    let oc = origin - c;
    let b = oc.dot(dir);
    let cc = oc.length_squared() - r * r;
    if cc <= 0.0 || b > 0.0 { return None; }
    let disc = b * b - cc;
    if disc < 0.0 { return None; }
    let toi = -b - disc.sqrt();
    let normal = (origin + dir * toi - c).normalize_or_zero();
    Some(RayHit { toi, normal })
}

fn ray_box(xf: &Isometry, he: Vec3, origin: Vec3, dir: Vec3) -> Option<RayHit> {
    let o = xf.inverse_transform_point(origin);
    let d = xf.inverse_transform_vector(dir);
    let (oa, da, ha) = (o.to_array(), d.to_array(), he.to_array());

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut axis = 0usize;
    for i in 0..3 {
        if da[i].abs() < 1.0e-12 {
            if oa[i] < -ha[i] || oa[i] > ha[i] { return None; }
            continue;
        }
        let inv = 1.0 / da[i];
        let mut t1 = (-ha[i] - oa[i]) * inv;
        let mut t2 = ( ha[i] - oa[i]) * inv;
        if t1 > t2 { core::mem::swap(&mut t1, &mut t2); }
        if t1 > t_enter { t_enter = t1; axis = i; }
        t_exit = t_exit.min(t2);
        if t_enter > t_exit { return None; }
    }
    if t_enter < 0.0 { return None; }

    let mut n_local = [0.0f32; 3];
    n_local[axis] = if da[axis] > 0.0 { -1.0 } else { 1.0 };
    let normal = xf.transform_vector(Vec3::from_array(n_local));
    Some(RayHit { toi: t_enter, normal })
}
