use roamphys_core::types::{Isometry, Vec3};
use roamphys_geom::{aabb_of, Shape};

/// Deepest points kept per shape pair.
pub const MAX_POINTS_PER_PAIR: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactPoint {
    /// World-space contact point (on the surface of the deeper shape).
    pub point: Vec3,
    /// Unit normal from A to B.
    pub normal: Vec3,
    pub depth: f32,
}

impl ContactPoint {
    #[inline] fn flipped(self) -> Self { Self { normal: -self.normal, ..self } }
}

/// Generate contacts between two posed shapes, appending to `out`.
/// Returns how many points were added.
pub fn collide(sa: &Shape, xa: &Isometry, sb: &Shape, xb: &Isometry, out: &mut Vec<ContactPoint>) -> usize {
    let start = out.len();
    match (*sa, *sb) {
        (Shape::Sphere { r: ra }, Shape::Sphere { r: rb }) => {
            out.extend(sphere_sphere(xa.pos, ra, xb.pos, rb));
        }
        (Shape::Sphere { r }, Shape::Plane) => out.extend(sphere_plane(xa.pos, r, xb)),
        (Shape::Plane, Shape::Sphere { r }) => out.extend(sphere_plane(xb.pos, r, xa).map(ContactPoint::flipped)),
        (Shape::Box { hx, hy, hz }, Shape::Plane) => box_plane(xa, Vec3::new(hx, hy, hz), xb, false, out),
        (Shape::Plane, Shape::Box { hx, hy, hz }) => box_plane(xb, Vec3::new(hx, hy, hz), xa, true, out),
        (Shape::Sphere { r }, Shape::Box { hx, hy, hz }) => {
            out.extend(sphere_box(xa.pos, r, xb, Vec3::new(hx, hy, hz)));
        }
        (Shape::Box { hx, hy, hz }, Shape::Sphere { r }) => {
            out.extend(sphere_box(xb.pos, r, xa, Vec3::new(hx, hy, hz)).map(ContactPoint::flipped));
        }
        (Shape::Box { .. }, Shape::Box { .. }) => out.extend(box_box_aabb(sa, xa, sb, xb)),
        (Shape::Plane, Shape::Plane) => {}
    }
    out.len() - start
}

fn sphere_sphere(pa: Vec3, ra: f32, pb: Vec3, rb: f32) -> Option<ContactPoint> {
    let d = pb - pa;
    let dist2 = d.length_squared();
    let rsum = ra + rb;
    if dist2 >= rsum * rsum { return None; }
    let dist = dist2.sqrt();
    let normal = if dist > 1.0e-6 { d / dist } else { Vec3::Y };
    Some(ContactPoint { point: pa + normal * ra, normal, depth: rsum - dist })
}

/// Sphere as A, plane as B.
fn sphere_plane(c: Vec3, r: f32, plane: &Isometry) -> Option<ContactPoint> {
    let n = plane.rot * Vec3::Y;
    let dist = (c - plane.pos).dot(n);
    if dist >= r { return None; }
    Some(ContactPoint { point: c - n * r, normal: -n, depth: r - dist })
}

/// Corner contacts of a box against a plane, deepest first.
fn box_plane(xbox: &Isometry, he: Vec3, plane: &Isometry, flip: bool, out: &mut Vec<ContactPoint>) {
    let n = plane.rot * Vec3::Y;
    let mut found: Vec<ContactPoint> = Vec::with_capacity(8);
    for sx in [-1.0f32, 1.0] {
        for sy in [-1.0f32, 1.0] {
            for sz in [-1.0f32, 1.0] {
                let corner = xbox.transform_point(Vec3::new(sx * he.x, sy * he.y, sz * he.z));
                let s = (corner - plane.pos).dot(n);
                if s < 0.0 {
                    found.push(ContactPoint { point: corner, normal: -n, depth: -s });
                }
            }
        }
    }
    found.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    found.truncate(MAX_POINTS_PER_PAIR);
    out.extend(found.into_iter().map(|c| if flip { c.flipped() } else { c }));
}

/// Sphere as A, oriented box as B.
fn sphere_box(c: Vec3, r: f32, xbox: &Isometry, he: Vec3) -> Option<ContactPoint> {
    let cl = xbox.inverse_transform_point(c);
    let q = cl.clamp(-he, he);
    let d = cl - q;
    let dist2 = d.length_squared();

    if dist2 > 1.0e-12 {
        if dist2 >= r * r { return None; }
        let dist = dist2.sqrt();
        let n_box_to_sphere = xbox.transform_vector(d / dist);
        return Some(ContactPoint {
            point: xbox.transform_point(q),
            normal: -n_box_to_sphere,
            depth: r - dist,
        });
    }

    // Centre inside the box: push out through the nearest face.
    let gaps = (he - cl.abs()).to_array();
    let mut axis = 0usize;
    for i in 1..3 { if gaps[i] < gaps[axis] { axis = i; } }
    let mut n_local = [0.0f32; 3];
    n_local[axis] = if cl.to_array()[axis] >= 0.0 { 1.0 } else { -1.0 };
    let n_out = xbox.transform_vector(Vec3::from_array(n_local));
    Some(ContactPoint { point: c, normal: -n_out, depth: r + gaps[axis] })
}

/// Axis-aligned approximation for box pairs: minimum-overlap axis of the world AABBs.
fn box_box_aabb(sa: &Shape, xa: &Isometry, sb: &Shape, xb: &Isometry) -> Option<ContactPoint> {
    let aa = aabb_of(sa, xa);
    let bb = aabb_of(sb, xb);
    if !aa.overlaps(&bb) { return None; }
    let ca = (aa.min + aa.max) * 0.5;
    let cb = (bb.min + bb.max) * 0.5;
    let px = (aa.max.x - bb.min.x).min(bb.max.x - aa.min.x);
    let py = (aa.max.y - bb.min.y).min(bb.max.y - aa.min.y);
    let pz = (aa.max.z - bb.min.z).min(bb.max.z - aa.min.z);
    let (normal, depth) = if px <= py && px <= pz {
        let dir = if cb.x > ca.x { 1.0 } else { -1.0 }; (Vec3::new(dir, 0.0, 0.0), px)
    } else if py <= pz {
        let dir = if cb.y > ca.y { 1.0 } else { -1.0 }; (Vec3::new(0.0, dir, 0.0), py)
    } else {
        let dir = if cb.z > ca.z { 1.0 } else { -1.0 }; (Vec3::new(0.0, 0.0, dir), pz)
    };
    if depth <= 0.0 { return None; }
    let lo = aa.min.max(bb.min);
    let hi = aa.max.min(bb.max);
    Some(ContactPoint { point: (lo + hi) * 0.5, normal, depth })
}
