//! roamphys-drive: run a scripted input timeline against a flat test world
//! and print a summary.

mod script;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use roamphys_core::{vec3, ControlLatch, Quat, Vec3};
use roamphys_geom::Shape;
use roamphys_session::{ModeState, Session, SessionConfig, SessionEvent};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use script::Script;

#[derive(Parser, Debug)]
#[command(name = "roamphys-drive", version, about = "Headless driving session with scripted input")]
struct Opts {
    /// Session config JSON (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds (default: script length)
    #[arg(long)]
    seconds: Option<f32>,

    /// Frames per simulated second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Input script JSON (default: built-in demo)
    #[arg(long)]
    script: Option<PathBuf>,

    /// World debug dump every N sub-steps (0 = off)
    #[arg(long, default_value_t = 0)]
    log_every: u32,

    /// Print the summary as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Serialize, Debug, Default)]
struct Summary {
    frames: u32,
    substeps: u32,
    mode: String,
    elapsed: f32,
    final_time: Option<f32>,
    position: [f32; 3],
    speed: f32,
    top_speed: f32,
    mode_changes: u32,
    respawns: u32,
    interactions: u32,
    state_hash: String,
}

/* ---------------- world ---------------- */
fn build_flat_world(session: &mut Session) {
    session.register_static_collider(Shape::Plane, Vec3::ZERO, Quat::IDENTITY);
    for (x, z) in [(15.0, 20.0), (-15.0, 40.0), (15.0, 60.0)] {
        session.register_static_collider(Shape::Box { hx: 3.0, hy: 2.0, hz: 3.0 }, vec3(x, 2.0, z), Quat::IDENTITY);
    }
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes { let _ = write!(s, "{b:02x}"); }
    s
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();
    if !(opts.fps.is_finite() && opts.fps > 0.0) {
        bail!("--fps must be positive (got {})", opts.fps);
    }

    let mut config = match &opts.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    config.debug.log_every = opts.log_every;
    let script = match &opts.script {
        Some(path) => Script::load(path)?,
        None => Script::demo(),
    };
    let seconds = opts.seconds.unwrap_or_else(|| script.duration());

    let mut session = Session::new(config)?;
    build_flat_world(&mut session);
    session.start();
    info!(seconds, fps = opts.fps, segments = script.segments.len(), "driving");

    let dt = 1.0 / opts.fps;
    let frames = (seconds * opts.fps).round().max(0.0) as u32;
    let mut latch = ControlLatch::new();
    let mut summary = Summary::default();

    for frame in 0..frames {
        let signal = latch.latch(&script.at(frame as f32 * dt));
        let report = session.frame(dt, &signal);
        summary.frames += 1;
        summary.substeps += report.substeps;
        summary.top_speed = summary.top_speed.max(report.speed);

        for event in session.drain_events() {
            match event {
                SessionEvent::ModeChanged { from, to } => {
                    summary.mode_changes += 1;
                    info!(frame, %from, %to, "mode");
                }
                SessionEvent::VehicleRespawned { .. } => summary.respawns += 1,
                SessionEvent::Interacted { .. } => summary.interactions += 1,
                _ => {}
            }
        }
        if session.current_mode() == ModeState::Ended { break; }
    }

    let pos = session.vehicle_pose().pos;
    summary.mode = session.current_mode().to_string();
    summary.elapsed = session.elapsed();
    summary.final_time = session.final_time();
    summary.position = [pos.x, pos.y, pos.z];
    summary.speed = session.vehicle_speed();
    summary.state_hash = hex(&session.world().state_hash());

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Mode:      {}", summary.mode);
        println!("Frames:    {} ({} sub-steps)", summary.frames, summary.substeps);
        println!("Elapsed:   {:.2}s", summary.elapsed);
        println!("Position:  ({:+.2}, {:+.2}, {:+.2})", pos.x, pos.y, pos.z);
        println!("Speed:     {:.2} (top {:.2})", summary.speed, summary.top_speed);
        println!("Changes:   {} mode, {} respawn, {} interact", summary.mode_changes, summary.respawns, summary.interactions);
        println!("Hash:      {}", summary.state_hash);
    }
    Ok(())
}
