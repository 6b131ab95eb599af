use std::path::Path;

use anyhow::Context;
use roamphys_controllers::{ChaseParams, DriveParams, OrbitParams};
use roamphys_core::types::{Scalar, Vec3};
use roamphys_core::vec3;
use roamphys_locomotion::AvatarParams;
use roamphys_materials::ContactMaterialTable;
use roamphys_vehicles::VehicleSetup;
use roamphys_world::{DebugSettings, WorldParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mode-switching and goal tuning.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeParams {
    /// Avatar must be strictly closer than this to re-enter the car.
    pub reentry_distance: Scalar,
    /// World-space offset from the chassis where the avatar is dropped on exit.
    pub exit_offset: Vec3,
    pub goal: Vec3,
    pub goal_radius: Scalar,
    /// Chassis up.y below this counts as inverted.
    pub inversion_dot: Scalar,
    pub inversion_respawn_secs: Scalar,
    /// Trunk interactable, chassis frame.
    pub trunk_offset: Vec3,
    pub trunk_radius: Scalar,
}

impl Default for ModeParams {
    fn default() -> Self {
        Self {
            reentry_distance: 5.0,
            exit_offset: vec3(2.0, 1.0, 0.0),
            goal: vec3(400.0, 0.0, 0.0),
            goal_radius: 30.0,
            inversion_dot: -0.5,
            inversion_respawn_secs: 2.0,
            trunk_offset: vec3(0.0, 0.0, 2.5),
            trunk_radius: 3.0,
        }
    }
}

/// Everything a session is built from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub world: WorldParams,
    pub materials: ContactMaterialTable,
    pub debug: DebugSettings,
    pub vehicle: VehicleSetup,
    pub drive: DriveParams,
    pub chase: ChaseParams,
    pub orbit: OrbitParams,
    pub avatar: AvatarParams,
    pub modes: ModeParams,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("world.{field} must be positive and finite (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("world.max_substeps must be at least 1")]
    NoSubsteps,
    #[error("drive.reverse_speed_cap ({reverse}) exceeds drive.forward_speed_cap ({forward})")]
    SpeedCaps { forward: f32, reverse: f32 },
    #[error("vehicle needs exactly 4 wheels, found {0}")]
    WheelCount(usize),
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let cfg: SessionConfig = serde_json::from_str(s).context("parsing session config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("loading {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        for (field, value) in [("substep", w.substep), ("max_dt", w.max_dt)] {
            if !(value.is_finite() && value > 0.0) { return Err(ConfigError::NonPositive { field, value }); }
        }
        if w.max_substeps == 0 { return Err(ConfigError::NoSubsteps); }
        if !w.gravity.is_finite() { return Err(ConfigError::NonFinite { field: "world.gravity" }); }

        let d = &self.drive;
        if d.reverse_speed_cap > d.forward_speed_cap {
            return Err(ConfigError::SpeedCaps { forward: d.forward_speed_cap, reverse: d.reverse_speed_cap });
        }
        if !d.respawn_position.is_finite() { return Err(ConfigError::NonFinite { field: "drive.respawn_position" }); }

        if self.vehicle.wheels.len() != 4 { return Err(ConfigError::WheelCount(self.vehicle.wheels.len())); }

        let m = &self.modes;
        if !(m.reentry_distance.is_finite() && m.goal_radius.is_finite() && m.goal.is_finite()) {
            return Err(ConfigError::NonFinite { field: "modes" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let cfg = SessionConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, SessionConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = SessionConfig::from_json_str(r#"{ "drive": { "forward_speed_cap": 60.0 }, "modes": { "reentry_distance": 3.0 } }"#).unwrap();
        assert_eq!(cfg.drive.forward_speed_cap, 60.0);
        assert_eq!(cfg.drive.reverse_speed_cap, 30.0);
        assert_eq!(cfg.modes.reentry_distance, 3.0);
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = SessionConfig::default();
        cfg.world.substep = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositive { field: "substep", .. })));

        let mut cfg = SessionConfig::default();
        cfg.drive.reverse_speed_cap = 500.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::SpeedCaps { .. })));

        let mut cfg = SessionConfig::default();
        cfg.vehicle.wheels.pop();
        assert_eq!(cfg.validate(), Err(ConfigError::WheelCount(3)));

        assert!(SessionConfig::from_json_str(r#"{ "world": { "max_substeps": 0 } }"#).is_err());
    }

    #[test]
    fn missing_file_mentions_path() {
        let err = SessionConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("here.json"));
    }
}
