use core::fmt;

use roamphys_controllers::DriveReport;
use roamphys_core::types::Scalar;
use roamphys_core::ControlSignal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ModeParams;
use crate::events::{RespawnReason, SessionEvent};
use crate::interact::InteractionKind;
use crate::stage::Stage;

/// Externally visible mode.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ModeState { #[default] Menu, Driving, Walking, Ended }

impl fmt::Display for ModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModeState::Menu => "MENU",
            ModeState::Driving => "DRIVING",
            ModeState::Walking => "WALKING",
            ModeState::Ended => "ENDED",
        })
    }
}

/// Result of one `Session::frame`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub mode: ModeState,
    pub substeps: u32,
    pub speed: Scalar,
    pub drive: Option<DriveReport>,
    pub mode_changed: bool,
}

/* ---------------- states ---------------- */
#[derive(Copy, Clone, Debug, Default)]
struct Menu { idle: Scalar }

#[derive(Copy, Clone, Debug, Default)]
struct Driving { inverted_for: Scalar }

#[derive(Copy, Clone, Debug, Default)]
struct Walking;

#[derive(Copy, Clone, Debug, Default)]
struct Ended { final_time: Scalar }

#[derive(Copy, Clone, Debug)]
enum Mode { Menu(Menu), Driving(Driving), Walking(Walking), Ended(Ended) }

impl Mode {
    fn state(&self) -> ModeState {
        match self {
            Mode::Menu(_) => ModeState::Menu,
            Mode::Driving(_) => ModeState::Driving,
            Mode::Walking(_) => ModeState::Walking,
            Mode::Ended(_) => ModeState::Ended,
        }
    }
}

impl Menu {
    fn frame(&mut self, stage: &mut Stage, dt: Scalar) {
        self.idle += dt;
        stage.camera = stage.orbit.at(self.idle);
    }
}

impl Driving {
    /// Leave the car: park controls, drop the avatar beside the chassis.
    fn toggle(&mut self, stage: &mut Stage, p: &ModeParams) -> Option<Mode> {
        stage.release_vehicle_controls();
        let drop = stage.chassis_pose().pos + p.exit_offset;
        stage.character.set_active(&mut stage.world, true);
        stage.character.reset_position(&mut stage.world, drop);
        Some(Mode::Walking(Walking))
    }

    fn control(&mut self, stage: &mut Stage, signal: &ControlSignal) -> Option<DriveReport> {
        let mut view = stage.world.vehicle_view(stage.vehicle)?;
        let report = stage.controller.apply(signal, &mut view);
        if report.respawned {
            stage.events.push(SessionEvent::VehicleRespawned { reason: RespawnReason::FellOut });
        }
        Some(report)
    }

    /// Inversion watch and goal check.
    fn settle(&mut self, stage: &mut Stage, p: &ModeParams, dt: Scalar) -> Option<Mode> {
        let Some(chassis) = stage.world.body(stage.chassis) else { return None; };
        let (up, pos) = (chassis.up(), chassis.pose.pos);

        if up.y < p.inversion_dot {
            self.inverted_for += dt;
            if self.inverted_for >= p.inversion_respawn_secs {
                self.inverted_for = 0.0;
                stage.respawn_vehicle(RespawnReason::Inverted);
                return None;
            }
        } else {
            self.inverted_for = 0.0;
        }

        if pos.distance(p.goal) < p.goal_radius {
            let time = stage.elapsed;
            info!(time, "goal reached");
            stage.release_vehicle_controls();
            stage.events.push(SessionEvent::GoalReached { time });
            return Some(Mode::Ended(Ended { final_time: time }));
        }
        None
    }

    fn camera(&mut self, stage: &mut Stage) {
        let pose = stage.chassis_pose();
        stage.camera = stage.chase.update(&pose);
    }
}

impl Walking {
    /// Re-enter only when strictly inside the re-entry distance; otherwise the
    /// edge is swallowed.
    fn toggle(&mut self, stage: &mut Stage, p: &ModeParams) -> Option<Mode> {
        let avatar = stage.character.position(&stage.world);
        let dist = avatar.distance(stage.chassis_pose().pos);
        if dist < p.reentry_distance {
            stage.character.set_active(&mut stage.world, false);
            stage.interactions.clear_focus();
            Some(Mode::Driving(Driving::default()))
        } else {
            debug!(dist, limit = p.reentry_distance, "re-entry refused");
            None
        }
    }

    fn control(&mut self, stage: &mut Stage, signal: &ControlSignal) {
        stage.character.look(signal.look_delta);
        let yaw = stage.character.yaw();
        stage.character.move_with(&mut stage.world, signal, yaw);
    }

    /// Trunk tracking, focus and the interact edge.
    fn settle(&mut self, stage: &mut Stage, p: &ModeParams, signal: &ControlSignal) {
        let trunk = stage.chassis_pose().transform_point(p.trunk_offset);
        stage.interactions.set_position(stage.trunk, trunk);
        let avatar = stage.character.position(&stage.world);
        let Some(index) = stage.interactions.update(avatar) else { return; };
        if !signal.interact_edge { return; }

        let Some(item) = stage.interactions.get(index) else { return; };
        let (label, kind) = (item.label.clone(), item.kind);
        debug!(index, %label, "interaction");
        stage.events.push(SessionEvent::Interacted { index, label });
        if kind == InteractionKind::Trunk {
            stage.trunk_open = !stage.trunk_open;
            stage.events.push(SessionEvent::TrunkToggled { open: stage.trunk_open });
        }
    }

    fn camera(&mut self, stage: &mut Stage) {
        stage.camera = stage.character.eye_camera(&stage.world);
    }
}

/* ---------------- coordinator ---------------- */
/// Owns the mode and every transition between modes.
pub struct ModeCoordinator {
    mode: Mode,
    pub params: ModeParams,
}

impl ModeCoordinator {
    pub fn new(params: ModeParams) -> Self { Self { mode: Mode::Menu(Menu::default()), params } }

    #[inline] pub fn state(&self) -> ModeState { self.mode.state() }

    pub fn final_time(&self) -> Option<Scalar> {
        match self.mode { Mode::Ended(e) => Some(e.final_time), _ => None }
    }

    fn enter(&mut self, stage: &mut Stage, next: Mode) {
        let (from, to) = (self.mode.state(), next.state());
        info!(%from, %to, "mode change");
        stage.events.push(SessionEvent::ModeChanged { from, to });
        self.mode = next;
    }

    /// MENU -> DRIVING. False from any other mode.
    pub(crate) fn start(&mut self, stage: &mut Stage) -> bool {
        if !matches!(self.mode, Mode::Menu(_)) { return false; }
        if let Some(view) = stage.world.vehicle_view(stage.vehicle) {
            stage.controller.respawn(view.chassis, view.rig);
        }
        stage.elapsed = 0.0;
        let pose = stage.chassis_pose();
        stage.camera = stage.chase.snap(&pose);
        info!("session started");
        self.enter(stage, Mode::Driving(Driving::default()));
        true
    }

    /// Any mode -> MENU, with the vehicle back at its safe pose and the avatar parked.
    pub(crate) fn reset(&mut self, stage: &mut Stage) {
        stage.character.set_active(&mut stage.world, false);
        stage.release_vehicle_controls();
        if let Some(view) = stage.world.vehicle_view(stage.vehicle) {
            stage.controller.respawn(view.chassis, view.rig);
        }
        stage.interactions.clear_focus();
        stage.trunk_open = false;
        stage.elapsed = 0.0;
        info!("session reset");
        if !matches!(self.mode, Mode::Menu(_)) {
            self.enter(stage, Mode::Menu(Menu::default()));
        }
    }

    pub(crate) fn frame(&mut self, stage: &mut Stage, dt: Scalar, signal: &ControlSignal) -> FrameReport {
        let mut report = FrameReport::default();
        let before = self.state();
        let dt = if dt.is_finite() { dt.clamp(0.0, stage.world.params().max_dt) } else { 0.0 };

        if matches!(self.mode, Mode::Driving(_) | Mode::Walking(_)) {
            self.play(stage, dt, signal, &mut report);
        } else if let Mode::Menu(m) = &mut self.mode {
            m.frame(stage, dt);
        }

        report.mode = self.state();
        report.mode_changed = self.state() != before;
        report.speed = stage.vehicle_speed();
        report
    }

    /// One DRIVING / WALKING frame: toggle, control, advance, settle, camera.
    fn play(&mut self, stage: &mut Stage, dt: Scalar, signal: &ControlSignal, report: &mut FrameReport) {
        let p = self.params;

        if signal.mode_toggle_edge {
            let next = match &mut self.mode {
                Mode::Driving(d) => d.toggle(stage, &p),
                Mode::Walking(w) => w.toggle(stage, &p),
                _ => None,
            };
            if let Some(next) = next { self.enter(stage, next); }
        }

        match &mut self.mode {
            Mode::Driving(d) => report.drive = d.control(stage, signal),
            Mode::Walking(w) => w.control(stage, signal),
            _ => {}
        }

        stage.elapsed += dt;
        report.substeps = stage.advance(dt).substeps;

        let next = match &mut self.mode {
            Mode::Driving(d) => d.settle(stage, &p, dt),
            Mode::Walking(w) => { w.settle(stage, &p, signal); None }
            _ => None,
        };
        if let Some(next) = next { self.enter(stage, next); }

        match &mut self.mode {
            Mode::Driving(d) => d.camera(stage),
            Mode::Walking(w) => w.camera(stage),
            _ => {}
        }
    }
}
