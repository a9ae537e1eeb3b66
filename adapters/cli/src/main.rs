#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Starfall session.

mod autopilot;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use starfall_core::{Event, InputIntents};
use starfall_system_session::{Config, Session};
use starfall_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Tuning;

/// Runs a deterministic combat session and prints a summary.
#[derive(Parser, Debug)]
#[command(name = "starfall", about = "Headless Starfall combat simulation")]
struct Cli {
    /// TOML tuning file; missing fields fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the tuning seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the playfield width.
    #[arg(long)]
    width: Option<f32>,
    /// Overrides the playfield height.
    #[arg(long)]
    height: Option<f32>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Let the scripted pilot fly instead of idling.
    #[arg(long, default_value_t = false)]
    autopilot: bool,
    /// Print the effective tuning as TOML and exit.
    #[arg(long, default_value_t = false)]
    dump_config: bool,
}

#[derive(Debug, Default)]
struct Summary {
    ticks: u64,
    wave: u32,
    enemies_destroyed: u32,
    bosses_defeated: u32,
    power_ups_collected: u32,
    lives_lost: u32,
    final_score: Option<u64>,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { tick, .. } => self.ticks = *tick,
                Event::WaveStarted { wave, .. } => self.wave = *wave,
                Event::EnemyDestroyed { .. } => self.enemies_destroyed += 1,
                Event::BossDefeated { .. } => self.bosses_defeated += 1,
                Event::PowerUpCollected { .. } => self.power_ups_collected += 1,
                Event::LifeLost { .. } => self.lives_lost += 1,
                Event::GameOver { score } => self.final_score = Some(*score),
                _ => {}
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut tuning = match &cli.config {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    if let Some(seed) = cli.seed {
        tuning.seed = seed;
    }
    if let Some(width) = cli.width {
        tuning.width = width;
    }
    if let Some(height) = cli.height {
        tuning.height = height;
    }
    let tuning = tuning.validate().context("invalid command-line overrides")?;

    if cli.dump_config {
        print!("{}", toml::to_string(&tuning).context("serializing tuning")?);
        return Ok(());
    }

    let mut session = Session::new(
        Config::new(tuning.seed, tuning.playfield()).with_tick_duration(tuning.tick_duration()),
    );
    info!(ticks = cli.ticks, autopilot = cli.autopilot, "simulation started");

    let mut summary = Summary::default();
    for _ in 0..cli.ticks {
        let intents = if cli.autopilot {
            autopilot::intents(session.world())
        } else {
            InputIntents::default()
        };
        summary.record(&session.step(&intents));
        if query::is_game_over(session.world()) {
            break;
        }
    }

    let world = session.world();
    println!("ticks simulated:     {}", summary.ticks);
    println!("wave reached:        {}", summary.wave);
    println!("enemies destroyed:   {}", summary.enemies_destroyed);
    println!("bosses defeated:     {}", summary.bosses_defeated);
    println!("power-ups collected: {}", summary.power_ups_collected);
    println!("lives lost:          {}", summary.lives_lost);
    match summary.final_score {
        Some(score) => println!("game over, final score {score}"),
        None => println!("score:               {}", query::score(world)),
    }
    Ok(())
}
