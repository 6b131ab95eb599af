use roamphys_core::types::{Scalar, Vec3};
use roamphys_core::vec3;
use roamphys_dynamics::SleepParams;
use serde::{Deserialize, Serialize};

/// Global simulation tuning.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    pub gravity: Vec3,
    /// Fixed sub-step size (s).
    pub substep: Scalar,
    /// Sub-steps allowed per `advance`.
    pub max_substeps: u32,
    /// Frame time is clamped to this before accumulation (s).
    pub max_dt: Scalar,
    pub solver_iterations: u32,
    /// Penetration allowed before positional correction kicks in.
    pub contact_slop: Scalar,
    /// Fraction of excess penetration removed per sub-step.
    pub contact_beta: Scalar,
    /// Closing speed under which restitution is ignored.
    pub restitution_threshold: Scalar,
    /// Cap on the speed-dependent broad-phase margin.
    pub ccd_margin_cap: Scalar,
    pub sleep: SleepParams,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            gravity: vec3(0.0, -10.0, 0.0),
            substep: 1.0 / 60.0,
            max_substeps: 20,
            max_dt: 0.1,
            solver_iterations: 20,
            contact_slop: 0.01,
            contact_beta: 0.1,
            restitution_threshold: 1.0,
            ccd_margin_cap: 1.0,
            sleep: SleepParams::default(),
        }
    }
}

/// Periodic debug dump through `tracing::debug!`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Dump every N sub-steps; 0 = off.
    pub log_every: u32,
    pub show_energy: bool,
    pub show_bodies: bool,
    pub show_contacts: bool,
    pub max_lines: usize,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self { log_every: 0, show_energy: true, show_bodies: false, show_contacts: false, max_lines: 16 }
    }
}
