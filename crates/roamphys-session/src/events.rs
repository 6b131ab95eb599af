use roamphys_core::BodyId;

use crate::mode::ModeState;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RespawnReason {
    /// Explicit request.
    Requested,
    FellOut,
    Inverted,
}

/// Outbound notifications, queued during a frame and drained by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    ModeChanged { from: ModeState, to: ModeState },
    VehicleRespawned { reason: RespawnReason },
    GoalReached { time: f32 },
    Interacted { index: usize, label: String },
    TrunkToggled { open: bool },
    TriggerOverlap { a: BodyId, b: BodyId },
}

#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    pending: Vec<SessionEvent>,
}

impl EventQueue {
    #[inline] pub fn push(&mut self, e: SessionEvent) { self.pending.push(e); }
    #[inline] pub fn len(&self) -> usize { self.pending.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.pending.is_empty() }
    pub fn drain(&mut self) -> Vec<SessionEvent> { std::mem::take(&mut self.pending) }
    pub fn clear(&mut self) { self.pending.clear(); }
}
