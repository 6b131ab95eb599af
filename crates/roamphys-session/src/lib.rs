//! Frame loop and mode state machine tying the world, the car and the
//! on-foot avatar together.

mod config;
mod events;
mod interact;
mod mode;
mod session;
mod stage;
mod sync;

pub use config::{ConfigError, ModeParams, SessionConfig};
pub use events::{EventQueue, RespawnReason, SessionEvent};
pub use interact::{Interactable, InteractionKind, Interactions};
pub use mode::{FrameReport, ModeCoordinator, ModeState};
pub use session::{Session, SessionError};
pub use sync::{as_bytes, SyncRecord, KIND_AVATAR, KIND_BODY, KIND_CHASSIS, KIND_WHEEL};
