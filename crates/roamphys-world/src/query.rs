use roamphys_core::types::{Scalar, Vec3};
use roamphys_core::BodyId;
use roamphys_dynamics::BodySet;
use roamphys_geom::ray_shape;
use roamphys_materials::MaterialId;

/// Nearest hit of a world ray query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayQueryHit {
    pub body: BodyId,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: Scalar,
    pub material: MaterialId,
}

/// Closest solid body along `dir` within `max_len`. Triggers, bodies outside
/// `mask` and `exclude` are skipped.
pub(crate) fn cast(
    bodies: &BodySet,
    origin: Vec3,
    dir: Vec3,
    max_len: Scalar,
    mask: u32,
    exclude: Option<BodyId>,
) -> Option<RayQueryHit> {
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO || !origin.is_finite() { return None; }
    let mut best: Option<RayQueryHit> = None;
    for (id, b) in bodies.iter() {
        if Some(id) == exclude || !b.collision_response || !b.filter.visible_to(mask) { continue; }
        let limit = best.map_or(max_len, |h| h.distance);
        if let Some(hit) = ray_shape(&b.shape, &b.collider_pose(), origin, dir, limit) {
            if best.map_or(true, |h| hit.toi < h.distance) {
                best = Some(RayQueryHit {
                    body: id,
                    point: origin + dir * hit.toi,
                    normal: hit.normal,
                    distance: hit.toi,
                    material: b.material,
                });
            }
        }
    }
    best
}
