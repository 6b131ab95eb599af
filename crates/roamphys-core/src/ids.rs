use core::fmt;

/// Handle into the physics world's body slots. A slot freed by `unregister`
/// bumps its generation, so stale handles stop resolving.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BodyId { pub slot: u32, pub generation: u32 }
impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "BodyId({}v{})", self.slot, self.generation) }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VehicleId(pub u32);
impl fmt::Display for VehicleId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "VehicleId({})", self.0) } }
