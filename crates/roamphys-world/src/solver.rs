use roamphys_core::types::{Mat3, Scalar, Vec3};
use roamphys_dynamics::BodySet;
use roamphys_materials::ContactMaterialTable;

use crate::params::WorldParams;

/// Narrow-phase output: one point between two body slots, normal A -> B.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Contact {
    pub a: usize,
    pub b: usize,
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: Scalar,
}

#[derive(Copy, Clone)]
struct Row {
    c: Contact,
    ra: Vec3,
    rb: Vec3,
    inv_a: Scalar,
    inv_b: Scalar,
    ia: Mat3,
    ib: Mat3,
    t1: Vec3,
    t2: Vec3,
    mass_n: Scalar,
    mass_t1: Scalar,
    mass_t2: Scalar,
    friction: Scalar,
    bias: Scalar,
    jn: Scalar,
    jt1: Scalar,
    jt2: Scalar,
}

/// Sequential impulses with accumulated clamping, then split positional correction.
pub(crate) fn solve_contacts(
    bodies: &mut BodySet,
    contacts: &[Contact],
    materials: &ContactMaterialTable,
    p: &WorldParams,
) {
    let mut rows: Vec<Row> = Vec::with_capacity(contacts.len());
    for c in contacts {
        let (Some(a), Some(b)) = (bodies.at(c.a), bodies.at(c.b)) else { continue; };
        let (inv_a, inv_b) = (a.inv_mass(), b.inv_mass());
        if inv_a + inv_b == 0.0 { continue; }
        let ra = c.point - a.pose.pos;
        let rb = c.point - b.pose.pos;
        let ia = a.inv_inertia_world();
        let ib = b.inv_inertia_world();
        let n = c.normal;
        let (t1, t2) = orthonormal_basis(n);
        let k = |d: Vec3| -> Scalar {
            let ka = ra.cross(d);
            let kb = rb.cross(d);
            inv_a + inv_b + ka.dot(ia * ka) + kb.dot(ib * kb)
        };
        let inv = |x: Scalar| if x > 0.0 { 1.0 / x } else { 0.0 };
        let pair = materials.pair(a.material, b.material);
        let vrel = b.point_velocity(c.point) - a.point_velocity(c.point);
        let vn = vrel.dot(n);
        let bias = if vn < -p.restitution_threshold { -pair.restitution * vn } else { 0.0 };
        rows.push(Row {
            c: *c, ra, rb, inv_a, inv_b, ia, ib, t1, t2,
            mass_n: inv(k(n)),
            mass_t1: inv(k(t1)),
            mass_t2: inv(k(t2)),
            friction: pair.friction,
            bias,
            jn: 0.0, jt1: 0.0, jt2: 0.0,
        });
    }

    for _ in 0..p.solver_iterations {
        for r in rows.iter_mut() {
            let Some((a, b)) = bodies.pair_mut(r.c.a, r.c.b) else { continue; };
            let n = r.c.normal;

            let vrel = (b.vel.lin + b.vel.ang.cross(r.rb)) - (a.vel.lin + a.vel.ang.cross(r.ra));
            let dj = r.mass_n * (-vrel.dot(n) + r.bias);
            let jn = (r.jn + dj).max(0.0);
            let dj = jn - r.jn;
            r.jn = jn;
            push(a, b, r, n * dj);

            let limit = r.friction * r.jn;
            let vrel = (b.vel.lin + b.vel.ang.cross(r.rb)) - (a.vel.lin + a.vel.ang.cross(r.ra));
            let d1 = -vrel.dot(r.t1) * r.mass_t1;
            let j1 = (r.jt1 + d1).clamp(-limit, limit);
            let d1 = j1 - r.jt1;
            r.jt1 = j1;
            let d2 = -vrel.dot(r.t2) * r.mass_t2;
            let j2 = (r.jt2 + d2).clamp(-limit, limit);
            let d2 = j2 - r.jt2;
            r.jt2 = j2;
            push(a, b, r, r.t1 * d1 + r.t2 * d2);
        }
    }

    for r in &rows {
        let corr = (r.c.depth - p.contact_slop).max(0.0) * p.contact_beta;
        if corr <= 0.0 { continue; }
        let Some((a, b)) = bodies.pair_mut(r.c.a, r.c.b) else { continue; };
        let dp = r.c.normal * (corr / (r.inv_a + r.inv_b));
        if a.is_active() { a.pose.pos -= dp * r.inv_a; }
        if b.is_active() { b.pose.pos += dp * r.inv_b; }
    }
}

#[inline]
fn push(a: &mut roamphys_dynamics::RigidBody, b: &mut roamphys_dynamics::RigidBody, r: &Row, j: Vec3) {
    if r.inv_a > 0.0 {
        a.vel.lin -= j * r.inv_a;
        a.vel.ang -= r.ia * r.ra.cross(j);
    }
    if r.inv_b > 0.0 {
        b.vel.lin += j * r.inv_b;
        b.vel.ang += r.ib * r.rb.cross(j);
    }
}

pub(crate) fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let ax = n.x.abs(); let ay = n.y.abs(); let az = n.z.abs();
    let base = if ax <= ay && ax <= az { Vec3::new(1.0, 0.0, 0.0) }
    else if ay <= az        { Vec3::new(0.0, 1.0, 0.0) }
    else                    { Vec3::new(0.0, 0.0, 1.0) };
    let t1 = base.cross(n).normalize_or_zero();
    let t2 = n.cross(t1);
    (t1, t2)
}
