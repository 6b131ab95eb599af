use thiserror::Error;
use crate::rig::WheelRole;

/// Malformed vehicle configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RigError {
    /// A fifth wheel was added.
    #[error("vehicle already has {max} wheels")]
    TooManyWheels {
        /// Wheel limit.
        max: usize,
    },
    /// Wheel role does not match its slot (slots 0-1 front, 2-3 rear).
    #[error("wheel {index} must be {expected:?}, got {found:?}")]
    RoleOrder {
        /// Slot being filled.
        index: usize,
        /// Role required for that slot.
        expected: WheelRole,
        /// Role supplied.
        found: WheelRole,
    },
    /// Rig used before all four wheels were added.
    #[error("vehicle needs exactly 4 wheels, has {found}")]
    WheelCount {
        /// Wheels present.
        found: usize,
    },
    /// A wheel parameter is non-finite or out of range.
    #[error("wheel {index}: invalid parameter `{field}`")]
    BadParameter {
        /// Wheel slot.
        index: usize,
        /// Offending field.
        field: &'static str,
    },
}
