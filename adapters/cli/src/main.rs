#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Elemental Defence headless.
//!
//! The runner loads a level and a session configuration, optionally places a
//! shared tower layout, then plays the requested number of waves at a fixed
//! frame rate and prints a summary of each.

mod layout_transfer;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use elemental_defence_simulation::{LogFeedback, NullPresenter, Simulation, SimulationConfig};
use elemental_defence_world::{query, Level};
use log::warn;

use crate::layout_transfer::TowerLayout;

/// Runs Elemental Defence without a renderer.
#[derive(Debug, Parser)]
#[command(name = "elemental-defence", version)]
struct Cli {
    /// Level description in JSON. Defaults to the classic three-lane field.
    #[arg(long)]
    level: Option<PathBuf>,
    /// Session settings in TOML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of waves to play.
    #[arg(long, default_value_t = 3)]
    waves: u32,
    /// Overrides the seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Tower layout string to place before the first wave.
    #[arg(long)]
    layout: Option<String>,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,
    /// Frames a single wave may take before the run is aborted.
    #[arg(long, default_value_t = 200_000)]
    max_frames: u32,
}

/// Entry point for the Elemental Defence command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    run(&Cli::parse())
}

fn run(cli: &Cli) -> Result<()> {
    ensure!(cli.frame_ms > 0, "--frame-ms must be positive");

    let level = match &cli.level {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read level {}", path.display()))?;
            Level::from_json_str(&text)
                .with_context(|| format!("invalid level {}", path.display()))?
        }
        None => Level::default(),
    };

    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SimulationConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }

    let mut simulation = Simulation::new(&level, config, NullPresenter, LogFeedback)
        .context("failed to start the session")?;
    println!("{}", query::welcome_banner(simulation.world()));

    if let Some(encoded) = &cli.layout {
        let layout = TowerLayout::decode(encoded).context("invalid --layout")?;
        ensure!(
            (layout.columns, layout.rows) == query::dimensions(simulation.world()),
            "layout is for a {}x{} grid but the level is {}x{}",
            layout.columns,
            layout.rows,
            level.dimensions().0,
            level.dimensions().1,
        );
        for tower in &layout.towers {
            let outcome = simulation.place_tower(tower.cell, tower.kind);
            if !outcome.success {
                warn!(
                    "skipped {} tower at {:?}: {}",
                    tower.kind, tower.cell, outcome.message
                );
            }
        }
    }

    let frame = Duration::from_millis(cli.frame_ms);
    'waves: for _ in 0..cli.waves {
        let started = simulation.start_wave();
        if !started.success {
            bail!("could not start a wave: {}", started.message);
        }
        let wave = simulation.waves().wave();

        for _ in 0..cli.max_frames {
            let report = simulation.tick(frame);
            if report.game_over {
                println!("Game Over! The core fell during wave {wave}.");
                break 'waves;
            }
            if let Some(cleared) = report.wave_cleared {
                println!(
                    "Wave {cleared} cleared: core {} health, {} gold",
                    query::core_health(simulation.world()),
                    simulation.ledger().gold(),
                );
                continue 'waves;
            }
        }
        bail!("wave {wave} did not finish within {} frames", cli.max_frames);
    }

    let layout = TowerLayout::capture(simulation.world())
        .encode()
        .context("failed to encode the final layout")?;
    println!("layout: {layout}");
    Ok(())
}
