//! SimSoviet headless runner
//!
//! Founds a settlement, drives the tick scheduler with a synthetic frame
//! clock and logs a summary when the run ends.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sim_soviet::city::terrain::{TerrainGrid, TerrainKind};
use sim_soviet::core::config::SimulationConfig;
use sim_soviet::core::error::{Result, SimError};
use sim_soviet::economy::resources::ResourceKind;
use sim_soviet::simulation::{save_to_file, GameSpeed, SimCommand, SimulationWorld, TickScheduler};
use sim_soviet::workforce::focus::CollectiveFocus;

/// Run a Soviet settlement without a UI
#[derive(Parser, Debug)]
#[command(name = "sim-soviet")]
#[command(about = "Headless planned-economy settlement simulation")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 1917)]
    seed: u64,

    /// Ticks (days) to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Speed multiplier, 1 to 3
    #[arg(long, default_value_t = 3)]
    speed: u32,

    /// Collective focus: food, construction, production or balanced
    #[arg(long, default_value = "balanced")]
    focus: CollectiveFocus,

    /// TOML file overriding the default configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON save here when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// Synthetic frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Map width in cells
    #[arg(long, default_value_t = 24)]
    width: u32,

    /// Map height in cells
    #[arg(long, default_value_t = 24)]
    height: u32,
}

/// Mostly plains with scattered forest, marsh and lakes
fn generate_terrain<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Option<TerrainGrid> {
    let cells = (0..width * height)
        .map(|_| match rng.gen_range(0..100) {
            0..=64 => TerrainKind::Plains,
            65..=84 => TerrainKind::Forest,
            85..=92 => TerrainKind::Marsh,
            93..=97 => TerrainKind::Water,
            _ => TerrainKind::Mountain,
        })
        .collect();
    TerrainGrid::from_cells(width, height, cells)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sim_soviet=info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let speed = GameSpeed::from_multiplier(args.speed)
        .filter(|s| *s != GameSpeed::Stopped)
        .ok_or_else(|| SimError::InvalidConfiguration(format!("speed must be 1, 2 or 3, got {}", args.speed)))?;

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let terrain = generate_terrain(args.width, args.height, &mut rng)
        .ok_or_else(|| SimError::InvalidConfiguration("map size overflows".into()))?;
    let mut world = SimulationWorld::new(config, terrain, &mut rng)?;
    world.submit(SimCommand::SetCollectiveFocus(args.focus));

    let frame = Duration::from_millis(args.frame_ms.max(1));
    let mut scheduler = TickScheduler::default();
    scheduler.set_speed(speed);
    info!(seed = args.seed, ticks = args.ticks, ?speed, "run starting");

    let mut ran = 0u64;
    while ran < args.ticks {
        match scheduler.run_frame(&mut world, &mut rng, frame) {
            Ok(report) => {
                ran += u64::from(report.ticks_run);
                if report.ended {
                    warn!(tick = world.current_tick(), "the chairman has been arrested");
                    break;
                }
            }
            Err(err) => {
                warn!(error = %err, tick = world.current_tick(), "tick aborted, stopping run");
                break;
            }
        }
    }

    let snapshot = world.snapshot();
    info!(
        date = %format!("{}-{:02}-{:02}", snapshot.date.year, snapshot.date.month, snapshot.date.day),
        doctrine = snapshot.doctrine.name(),
        tier = snapshot.tier.name(),
        threat = snapshot.threat.name(),
        citizens = snapshot.citizens.len(),
        buildings = snapshot.buildings,
        food = snapshot.resources.get(&ResourceKind::Food).copied().unwrap_or_default(),
        score = snapshot.score,
        "run finished"
    );
    for award in world.scoring().medals() {
        info!(medal = award.medal.name(), era = award.doctrine.name(), tick = award.tick, "medal");
    }

    if let Some(path) = &args.save {
        save_to_file(&world, path)?;
    }
    Ok(())
}
