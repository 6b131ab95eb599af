use bytemuck::{Pod, Zeroable};
use roamphys_core::types::Isometry;

pub const KIND_CHASSIS: u32 = 0;
pub const KIND_WHEEL: u32 = 1;
pub const KIND_AVATAR: u32 = 2;
pub const KIND_BODY: u32 = 3;

/// One entity's world transform for the render side.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SyncRecord {
    pub kind: u32,
    /// Wheel index, body slot, or 0.
    pub index: u32,
    pub position: [f32; 3],
    /// x, y, z, w
    pub rotation: [f32; 4],
}

impl SyncRecord {
    pub fn new(kind: u32, index: u32, pose: &Isometry) -> Self {
        Self {
            kind,
            index,
            position: [pose.pos.x, pose.pos.y, pose.pos.z],
            rotation: pose.rot.to_array(),
        }
    }
}

/// Raw bytes of a frame's records.
pub fn as_bytes(records: &[SyncRecord]) -> &[u8] { bytemuck::cast_slice(records) }
