use roamphys_core::BodyId;
use crate::body::RigidBody;

#[derive(Clone, Debug, Default)]
struct Slot { generation: u32, body: Option<RigidBody> }

/// Slot storage for bodies. Iteration is always in slot order; freed slots are
/// reused most-recent-first so removing and re-inserting a body puts it back
/// where it was.
#[derive(Clone, Debug, Default)]
pub struct BodySet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl BodySet {
    pub fn with_capacity(cap: usize) -> Self {
        Self { slots: Vec::with_capacity(cap), free: Vec::new(), len: 0 }
    }

    #[inline] pub fn len(&self) -> usize { self.len }
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }
    /// Number of slots ever allocated (occupied or free).
    #[inline] pub fn slot_count(&self) -> usize { self.slots.len() }

    pub fn insert(&mut self, body: RigidBody) -> BodyId {
        self.len += 1;
        if let Some(slot) = self.free.pop() {
            let s = &mut self.slots[slot as usize];
            s.body = Some(body);
            return BodyId { slot, generation: s.generation };
        }
        self.slots.push(Slot { generation: 0, body: Some(body) });
        BodyId { slot: (self.slots.len() - 1) as u32, generation: 0 }
    }

    pub fn remove(&mut self, id: BodyId) -> Option<RigidBody> {
        let s = self.slots.get_mut(id.slot as usize)?;
        if s.generation != id.generation { return None; }
        let body = s.body.take()?;
        s.generation = s.generation.wrapping_add(1);
        self.free.push(id.slot);
        self.len -= 1;
        Some(body)
    }

    #[inline] pub fn contains(&self, id: BodyId) -> bool { self.get(id).is_some() }

    pub fn get(&self, id: BodyId) -> Option<&RigidBody> {
        let s = self.slots.get(id.slot as usize)?;
        if s.generation != id.generation { return None; }
        s.body.as_ref()
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let s = self.slots.get_mut(id.slot as usize)?;
        if s.generation != id.generation { return None; }
        s.body.as_mut()
    }

    /// Current handle of an occupied slot.
    pub fn id_at(&self, slot: usize) -> Option<BodyId> {
        let s = self.slots.get(slot)?;
        s.body.as_ref().map(|_| BodyId { slot: slot as u32, generation: s.generation })
    }

    #[inline] pub fn at(&self, slot: usize) -> Option<&RigidBody> {
        self.slots.get(slot).and_then(|s| s.body.as_ref())
    }
    #[inline] pub fn at_mut(&mut self, slot: usize) -> Option<&mut RigidBody> {
        self.slots.get_mut(slot).and_then(|s| s.body.as_mut())
    }

    /// Two distinct occupied slots, mutably.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut RigidBody, &mut RigidBody)> {
        if a == b { return None; }
        let (lo, hi, swapped) = if a < b { (a, b, false) } else { (b, a, true) };
        if hi >= self.slots.len() { return None; }
        let (left, right) = self.slots.split_at_mut(hi);
        let x = left[lo].body.as_mut()?;
        let y = right[0].body.as_mut()?;
        Some(if swapped { (y, x) } else { (x, y) })
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.body.as_ref().map(|b| (BodyId { slot: i as u32, generation: s.generation }, b))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut RigidBody)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| {
            let generation = s.generation;
            s.body.as_mut().map(|b| (BodyId { slot: i as u32, generation }, b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamphys_geom::Shape;

    fn ball() -> RigidBody { RigidBody::new(Shape::Sphere { r: 0.5 }, 1.0) }

    #[test] fn stale_handle_misses() {
        let mut set = BodySet::default();
        let a = set.insert(ball());
        assert!(set.remove(a).is_some());
        assert!(set.get(a).is_none());
        assert!(set.remove(a).is_none());
        let b = set.insert(ball());
        assert_eq!(b.slot, a.slot);
        assert_ne!(b.generation, a.generation);
        assert!(set.get(a).is_none());
    }

    #[test] fn reinsert_keeps_slot_order() {
        let mut set = BodySet::default();
        let _a = set.insert(ball());
        let b = set.insert(ball());
        let _c = set.insert(ball());
        let body = set.remove(b).unwrap();
        let b2 = set.insert(body);
        assert_eq!(b2.slot, b.slot);
        let slots: Vec<u32> = set.iter().map(|(id, _)| id.slot).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert_eq!(set.len(), 3);
    }

    #[test] fn pair_mut_orders_by_argument() {
        let mut set = BodySet::default();
        let a = set.insert(ball());
        let b = set.insert(RigidBody::new(Shape::Sphere { r: 2.0 }, 1.0));
        let (x, y) = set.pair_mut(b.slot as usize, a.slot as usize).unwrap();
        assert_eq!(x.shape, Shape::Sphere { r: 2.0 });
        assert_eq!(y.shape, Shape::Sphere { r: 0.5 });
        assert!(set.pair_mut(0, 0).is_none());
    }
}
