use roamphys_geom::Aabb;

/// 1D sweep-and-prune along X with full AABB overlap; non-finite boxes are skipped.
/// Output pairs are `(lo, hi)` index pairs, sorted.
pub fn pairs_sap(aabbs: &[Aabb]) -> Vec<(usize, usize)> {
    #[derive(Copy, Clone)]
    struct Elem { min: f32, max: f32, idx: usize }

    let mut elems: Vec<Elem> = Vec::with_capacity(aabbs.len());
    for (i, a) in aabbs.iter().enumerate() {
        let mut mn = a.min.x;
        let mut mx = a.max.x;
        if !mn.is_finite() || !mx.is_finite() { continue; }
        if mn > mx { core::mem::swap(&mut mn, &mut mx); }
        elems.push(Elem { min: mn, max: mx, idx: i });
    }

    elems.sort_by(|a, b| a.min.total_cmp(&b.min).then(a.idx.cmp(&b.idx)));

    let mut active: Vec<Elem> = Vec::new();
    let mut out: Vec<(usize, usize)> = Vec::new();

    for e in elems {
        active.retain(|j| j.max >= e.min);
        for j in &active {
            let (i, k) = if j.idx < e.idx { (j.idx, e.idx) } else { (e.idx, j.idx) };
            if aabbs[i].overlaps(&aabbs[k]) { out.push((i, k)); }
        }
        active.push(e);
    }

    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamphys_core::vec3;

    #[test] fn finds_only_overlapping() {
        let boxes = [
            Aabb::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0)),
            Aabb::new(vec3(0.5, 0.5, 0.5), vec3(2.0, 2.0, 2.0)),
            Aabb::new(vec3(5.0, 0.0, 0.0), vec3(6.0, 1.0, 1.0)),
            Aabb::new(vec3(0.5, 5.0, 0.5), vec3(0.9, 6.0, 0.9)),
        ];
        assert_eq!(pairs_sap(&boxes), vec![(0, 1)]);
    }

    #[test] fn large_box_pairs_with_everything() {
        let boxes = [
            Aabb::new(vec3(3.0, 0.0, 0.0), vec3(4.0, 1.0, 1.0)),
            Aabb::new(vec3(-1.0e6, -1.0e6, -1.0e6), vec3(1.0e6, 1.0e6, 1.0e6)),
            Aabb::new(vec3(-9.0, 0.0, 0.0), vec3(-8.0, 1.0, 1.0)),
        ];
        assert_eq!(pairs_sap(&boxes), vec![(0, 1), (1, 2)]);
    }
}
