mod broadphase;
mod narrowphase;

pub use broadphase::pairs_sap;
pub use narrowphase::{collide, ContactPoint, MAX_POINTS_PER_PAIR};

/// Collision group / mask pair. Two filters interact when each one's group is in
/// the other's mask.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CollisionFilter { pub group: u32, pub mask: u32 }

impl CollisionFilter {
    #[inline] pub fn new(group: u32, mask: u32) -> Self { Self { group, mask } }
    #[inline] pub fn interacts(&self, other: &CollisionFilter) -> bool {
        (self.group & other.mask) != 0 && (other.group & self.mask) != 0
    }
    /// Whether a query carrying `mask` should see this filter's group.
    #[inline] pub fn visible_to(&self, mask: u32) -> bool { (self.group & mask) != 0 }
}
