use std::path::Path;

use anyhow::{Context, Result};
use roamphys_core::RawControls;
use serde::{Deserialize, Serialize};

/// Hold `controls` for `seconds`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Segment {
    pub seconds: f32,
    pub controls: RawControls,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Script {
    pub segments: Vec<Segment>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse script {}", path.display()))
    }

    /// Settle, drive, turn, brake, hop out, walk, hop back in.
    pub fn demo() -> Self {
        let seg = |seconds, controls| Segment { seconds, controls };
        let idle = RawControls::default();
        let gas = RawControls { forward: true, ..idle };
        Self {
            segments: vec![
                seg(1.0, idle),
                seg(3.0, gas),
                seg(1.0, RawControls { right: true, ..gas }),
                seg(1.5, RawControls { backward: true, ..idle }),
                seg(0.5, RawControls { handbrake: true, ..idle }),
                seg(0.1, RawControls { toggle: true, ..idle }),
                seg(0.5, idle),
                seg(0.1, RawControls { toggle: true, ..idle }),
                seg(2.0, RawControls { forward: true, boost: true, ..idle }),
            ],
        }
    }

    pub fn duration(&self) -> f32 { self.segments.iter().map(|s| s.seconds.max(0.0)).sum() }

    /// Held controls at time `t`; idle past the end.
    pub fn at(&self, t: f32) -> RawControls {
        let mut end = 0.0;
        for s in &self.segments {
            end += s.seconds.max(0.0);
            if t < end { return s.controls; }
        }
        RawControls::default()
    }
}
