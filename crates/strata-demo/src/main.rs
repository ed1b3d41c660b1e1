//! Headless strata runner.
//!
//! Opens (or creates) a world on disk, drops a body onto the terrain and
//! walks it around for a fixed number of ticks, breaking and placing blocks
//! along the way. Configuration is loaded from `config.ron` and can be
//! overridden via CLI flags, e.g. `strata-demo --world test --ticks 600`.

use std::process::ExitCode;

use clap::Parser;
use glam::{Vec2, Vec3};
use strata_config::{CliArgs, Config, default_config_dir};
use strata_game::{Look, Session, TickInput};
use strata_log::init_logging;
use strata_physics::MoveIntent;
use strata_voxel::VoxelKind;
use tracing::{error, info};

const DEFAULT_TICKS: u32 = 300;
const SPAWN: Vec3 = Vec3::new(0.5, 64.0, 0.5);
const TURN_PER_TICK: f32 = 0.01;
const EDIT_INTERVAL: u64 = 120;
const PALETTE: [VoxelKind; 4] = [
    VoxelKind::Stone,
    VoxelKind::Wood,
    VoxelKind::Sand,
    VoxelKind::Dirt,
];

/// Totals over a run.
#[derive(Debug, Default)]
struct RunStats {
    streaming_passes: u32,
    chunks_generated: usize,
    chunks_loaded: usize,
    chunks_evicted: usize,
    unsaved_evictions: usize,
    broken: u32,
    placed: u32,
    faces_drawn: usize,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    info!(
        "Config: world={}, render_distance={}, load_radius={}, unload_radius={}",
        config.world.name,
        config.render.render_distance,
        config.streaming.load_radius,
        config.streaming.unload_radius,
    );

    match run(&config, args.ticks.unwrap_or(DEFAULT_TICKS)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, ticks: u32) -> Result<(), strata_world::WorldError> {
    let mut session = Session::open_on_disk(config, SPAWN)?;
    if !session.drop_to_surface()? {
        info!("No ground under spawn, starting in the air");
    }
    session.set_look(Look::facing(Vec3::new(0.0, -0.4, 1.0)));

    let mut stats = RunStats::default();
    let mut blocked = false;
    for _ in 0..ticks {
        let input = scripted_input(session.ticks() + 1, blocked);
        let out = session.tick(input)?;

        blocked = out.step.blocked_x || out.step.blocked_z;
        if !out.streaming.skipped {
            stats.streaming_passes += 1;
        }
        stats.chunks_generated += out.streaming.generated;
        stats.chunks_loaded += out.streaming.loaded;
        stats.chunks_evicted += out.streaming.evicted;
        stats.unsaved_evictions += out.streaming.dirty_evicted.len();
        stats.broken += u32::from(out.interaction.broken.is_some());
        stats.placed += u32::from(out.interaction.placed.is_some());
        stats.faces_drawn = out.cull.faces_emitted;
    }

    let body = session.body();
    info!(
        "Ran {} ticks, body at {} (grounded: {})",
        session.ticks(),
        body.position,
        body.grounded
    );
    info!("{stats:?}");

    let summary = session.save()?;
    info!(
        "Saved {} chunks of '{}'",
        summary.chunks_written,
        session.world().name()
    );
    Ok(())
}

/// Walk forward while slowly circling, hop when something is in the way,
/// and every few seconds break or place whatever is under the crosshair.
fn scripted_input(tick: u64, blocked: bool) -> TickInput {
    let phase = tick % EDIT_INTERVAL;
    let round = (tick / EDIT_INTERVAL) as usize;
    TickInput {
        intent: MoveIntent {
            forward: 1.0,
            jump: blocked,
            ..Default::default()
        },
        look_delta: Vec2::new(TURN_PER_TICK, 0.0),
        break_block: phase == 0,
        place_block: phase == EDIT_INTERVAL / 2,
        select: (phase == EDIT_INTERVAL / 2).then(|| PALETTE[round % PALETTE.len()]),
        ..Default::default()
    }
}
