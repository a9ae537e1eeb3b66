#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave lifecycle system that paces formations, regular spawns and bosses.
//!
//! A wave runs for a fixed number of ticks (boss waves run until the boss is
//! destroyed), then enters a short ending phase during which survivors are
//! cleared before the next wave opens with a formation or a boss.

mod formation;

pub use formation::Formation;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use starfall_core::{
    boss_level, is_boss_wave, Command, DifficultyScale, EnemyKind, Event, Playfield,
};
use tracing::{debug, info};

/// Ticks a regular wave lasts before it ends.
pub const WAVE_DURATION: u32 = 900;
/// Ticks between the end of a wave and the start of the next one.
pub const WAVE_DELAY: u32 = 180;
/// Ticks between regular spawn attempts.
pub const SPAWN_INTERVAL: u32 = 60;

const SPAWN_HEIGHT: f32 = -50.0;
const SPAWN_MARGIN: f32 = 48.0;

/// Configuration parameters required to construct the waves system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration whose regular spawns derive from `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Active { elapsed: u32 },
    Ending { elapsed: u32 },
}

/// Pure system that emits wave, formation and spawn commands.
#[derive(Debug)]
pub struct Waves {
    seed: u64,
    rng: ChaCha8Rng,
    wave: u32,
    phase: Phase,
    spawn_timer: u32,
}

impl Waves {
    /// Creates a waves system waiting for the first tick.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            seed: config.rng_seed,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            wave: 0,
            phase: Phase::Idle,
            spawn_timer: 0,
        }
    }

    /// Number of the current wave, zero before the first one starts.
    #[must_use]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Consumes events and world views to emit wave commands.
    ///
    /// `live_enemies` counts regular enemies only; `boss_alive` reports
    /// whether a boss is currently on the field.
    pub fn handle(
        &mut self,
        events: &[Event],
        playfield: &Playfield,
        live_enemies: usize,
        boss_alive: bool,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::SessionReset => self.reset(),
                Event::BossDefeated { .. } => {
                    if matches!(self.phase, Phase::Active { .. }) && is_boss_wave(self.wave) {
                        self.end_wave(out);
                    }
                }
                Event::TimeAdvanced { .. } => {
                    self.step(playfield, live_enemies, boss_alive, out);
                }
                _ => {}
            }
        }
    }

    fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.wave = 0;
        self.phase = Phase::Idle;
        self.spawn_timer = 0;
    }

    fn step(
        &mut self,
        playfield: &Playfield,
        live_enemies: usize,
        boss_alive: bool,
        out: &mut Vec<Command>,
    ) {
        match self.phase {
            Phase::Idle => self.start_wave(1, playfield, out),
            Phase::Active { elapsed } => {
                let elapsed = elapsed + 1;
                self.phase = Phase::Active { elapsed };
                if !is_boss_wave(self.wave) && !boss_alive {
                    self.spawn_timer += 1;
                    if self.spawn_timer >= SPAWN_INTERVAL && live_enemies < max_enemies(self.wave)
                    {
                        self.spawn_timer = 0;
                        self.spawn_regular(playfield, out);
                    }
                }
                if elapsed >= WAVE_DURATION {
                    if boss_alive {
                        info!(wave = self.wave, "boss outlasted the wave timer");
                    }
                    self.end_wave(out);
                }
            }
            Phase::Ending { elapsed } => {
                let elapsed = elapsed + 1;
                if elapsed >= WAVE_DELAY {
                    self.start_wave(self.wave + 1, playfield, out);
                } else {
                    self.phase = Phase::Ending { elapsed };
                }
            }
        }
    }

    fn start_wave(&mut self, wave: u32, playfield: &Playfield, out: &mut Vec<Command>) {
        self.wave = wave;
        self.phase = Phase::Active { elapsed: 0 };
        self.spawn_timer = 0;
        out.push(Command::StartWave { wave });

        if is_boss_wave(wave) {
            let level = boss_level(wave);
            info!(wave, level, "boss wave started");
            out.push(Command::SpawnBoss { level });
            return;
        }

        let formation = Formation::for_wave(wave);
        let layout = formation.layout(wave, playfield);
        info!(wave, ?formation, enemies = layout.len(), "wave started");
        let scale = DifficultyScale::for_wave(wave);
        out.extend(layout.into_iter().map(|(kind, position)| Command::SpawnEnemy {
            kind,
            position,
            scale,
            pattern: None,
        }));
    }

    fn end_wave(&mut self, out: &mut Vec<Command>) {
        info!(wave = self.wave, "wave ended");
        self.phase = Phase::Ending { elapsed: 0 };
        out.push(Command::ClearEnemies { staggered: true });
        out.push(Command::EndWave {
            wave: self.wave,
            boss_next: is_boss_wave(self.wave + 1),
        });
    }

    fn spawn_regular(&mut self, playfield: &Playfield, out: &mut Vec<Command>) {
        let roll = self.rng.gen::<f32>() * 100.0;
        let kind = regular_kind(self.wave, roll);
        let span = (playfield.width() - SPAWN_MARGIN).max(0.0);
        let x = self.rng.gen::<f32>() * span;
        debug!(wave = self.wave, ?kind, x, "regular spawn");
        out.push(Command::SpawnEnemy {
            kind,
            position: Vec2::new(x, SPAWN_HEIGHT),
            scale: DifficultyScale::for_wave(self.wave),
            pattern: None,
        });
    }
}

/// Regular enemies allowed on the field at once during `wave`.
#[must_use]
pub fn max_enemies(wave: u32) -> usize {
    let extra = (wave as f32 * 2.5).floor() as usize;
    15 + extra.min(40)
}

/// Enemy family for a regular spawn, given a roll in `[0, 100)`.
fn regular_kind(wave: u32, roll: f32) -> EnemyKind {
    let (small, medium) = match wave {
        0..=2 => (85.0, 100.0),
        3..=4 => (60.0, 95.0),
        5..=7 => (40.0, 80.0),
        _ => (25.0, 65.0),
    };
    if roll < small {
        EnemyKind::Small
    } else if roll < medium {
        EnemyKind::Medium
    } else {
        EnemyKind::Large
    }
}
