use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Normalized per-frame control record. Produced by the input layer, consumed by
/// whichever mode currently owns input.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSignal {
    pub throttle: bool,
    pub reverse_or_brake: bool,
    /// Digital steer axis in [-1, 1], +1 = right.
    pub steer: f32,
    /// Analog steer in [-1, 1]. Takes precedence over `steer` when present and non-zero.
    pub analog_steer: Option<f32>,
    pub handbrake: bool,
    pub boost: bool,
    pub mode_toggle_edge: bool,
    pub interact_edge: bool,
    /// Pointer movement since the previous frame, in pixels.
    pub look_delta: Vec2,
}

impl ControlSignal {
    /// Effective steer axis.
    pub fn steer_axis(&self) -> f32 {
        match self.analog_steer {
            Some(a) if a != 0.0 && a.is_finite() => a.clamp(-1.0, 1.0),
            _ if self.steer.is_finite() => self.steer.clamp(-1.0, 1.0),
            _ => 0.0,
        }
    }

    /// On-foot move intent: x = right, y = forward. Not normalized.
    pub fn move_intent(&self) -> Vec2 {
        let fwd = (self.throttle as i32 - self.reverse_or_brake as i32) as f32;
        Vec2::new(self.steer_axis(), fwd)
    }
}

/// Held state of the device buttons for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawControls {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub handbrake: bool,
    pub boost: bool,
    pub toggle: bool,
    pub interact: bool,
    pub analog_steer: Option<f32>,
    pub look_delta: Vec2,
}

/// Turns held buttons into a `ControlSignal`, raising the edge flags only on
/// the not-held to held transition.
#[derive(Copy, Clone, Debug, Default)]
pub struct ControlLatch { prev_toggle: bool, prev_interact: bool }

impl ControlLatch {
    pub fn new() -> Self { Self::default() }

    pub fn latch(&mut self, raw: &RawControls) -> ControlSignal {
        let toggle_edge = raw.toggle && !self.prev_toggle;
        let interact_edge = raw.interact && !self.prev_interact;
        self.prev_toggle = raw.toggle;
        self.prev_interact = raw.interact;
        ControlSignal {
            throttle: raw.forward,
            reverse_or_brake: raw.backward,
            steer: (raw.right as i32 - raw.left as i32) as f32,
            analog_steer: raw.analog_steer,
            handbrake: raw.handbrake,
            boost: raw.boost,
            mode_toggle_edge: toggle_edge,
            interact_edge,
            look_delta: raw.look_delta,
        }
    }
}
