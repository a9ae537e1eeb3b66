#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-tick session driver that owns the world and every system.
//!
//! Hosts feed wall-clock time and frozen input intents into
//! [`Session::advance`]. The session converts elapsed time into whole ticks,
//! and for each tick applies the control commands, advances the world,
//! resolves collisions and lets the reactive systems answer world events until
//! no further commands are produced.

use std::time::Duration;

use starfall_core::{Command, Event, InputIntents, Playfield, TICK_DURATION};
use starfall_system_collision::Collision;
use starfall_system_controls::Controls;
use starfall_system_drops::{self as drops, Drops};
use starfall_system_waves::{self as waves, Waves};
use starfall_world::{self as world, query, World};
use tracing::{debug, info};

/// Most ticks a single call to [`Session::advance`] will run.
pub const MAX_CATCH_UP_TICKS: u32 = 5;

const WAVES_STREAM: u64 = 1;
const DROPS_STREAM: u64 = 2;

/// Configuration parameters required to construct a session.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    seed: u64,
    playfield: Playfield,
    tick_duration: Duration,
}

impl Config {
    /// Creates a configuration for a playfield driven at the default tick rate.
    #[must_use]
    pub const fn new(seed: u64, playfield: Playfield) -> Self {
        Self {
            seed,
            playfield,
            tick_duration: TICK_DURATION,
        }
    }

    /// Overrides the wall time covered by one tick. Zero durations are ignored.
    #[must_use]
    pub fn with_tick_duration(mut self, tick_duration: Duration) -> Self {
        if !tick_duration.is_zero() {
            self.tick_duration = tick_duration;
        }
        self
    }
}

/// Owns the world, the systems and the fixed-tick accumulator.
#[derive(Debug)]
pub struct Session {
    world: World,
    controls: Controls,
    waves: Waves,
    collision: Collision,
    drops: Drops,
    tick_duration: Duration,
    accumulator: Duration,
}

impl Session {
    /// Creates a session and configures the world's playfield.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut session = Self {
            world: World::with_seed(config.seed),
            controls: Controls::new(),
            waves: Waves::new(waves::Config::new(stream_seed(config.seed, WAVES_STREAM))),
            collision: Collision::new(),
            drops: Drops::new(drops::Config::new(stream_seed(config.seed, DROPS_STREAM))),
            tick_duration: config.tick_duration,
            accumulator: Duration::ZERO,
        };
        let mut events = Vec::new();
        session.execute(
            vec![Command::ConfigurePlayfield {
                width: config.playfield.width(),
                height: config.playfield.height(),
            }],
            &mut events,
        );
        info!(
            seed = config.seed,
            width = config.playfield.width(),
            height = config.playfield.height(),
            "session created"
        );
        session
    }

    /// Read-only access to the world for `starfall_world::query` calls.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Wall time covered by one tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Accumulates `elapsed` wall time and runs every tick that became due.
    ///
    /// At most [`MAX_CATCH_UP_TICKS`] ticks run per call; a larger backlog is
    /// dropped. While paused only the pause toggle is processed, and after game
    /// over no ticks run at all.
    pub fn advance(&mut self, elapsed: Duration, intents: &InputIntents) -> Vec<Event> {
        let mut log = Vec::new();
        if query::is_game_over(&self.world) {
            self.accumulator = Duration::ZERO;
            return log;
        }
        if query::is_paused(&self.world) {
            self.accumulator = Duration::ZERO;
            let mut commands = Vec::new();
            self.controls.handle(intents, true, &mut commands);
            self.execute(commands, &mut log);
            return log;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);
        let mut ticks = 0;
        while self.accumulator >= self.tick_duration {
            if ticks == MAX_CATCH_UP_TICKS {
                debug!(backlog = ?self.accumulator, "dropping tick backlog");
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= self.tick_duration;
            ticks += 1;
            self.tick(intents, &mut log);
            if query::is_paused(&self.world) || query::is_game_over(&self.world) {
                self.accumulator = Duration::ZERO;
                break;
            }
        }
        log
    }

    /// Runs exactly one tick regardless of the accumulator.
    pub fn step(&mut self, intents: &InputIntents) -> Vec<Event> {
        let mut log = Vec::new();
        if query::is_game_over(&self.world) {
            return log;
        }
        if query::is_paused(&self.world) {
            let mut commands = Vec::new();
            self.controls.handle(intents, true, &mut commands);
            self.execute(commands, &mut log);
            return log;
        }
        self.tick(intents, &mut log);
        log
    }

    /// Restores score, wave and every entity collection to their initial state.
    pub fn restart(&mut self) -> Vec<Event> {
        info!(
            score = query::score(&self.world),
            wave = query::wave(&self.world),
            "session restarted"
        );
        self.controls.release_all();
        self.accumulator = Duration::ZERO;
        let mut log = Vec::new();
        self.execute(vec![Command::ResetSession], &mut log);
        log
    }

    fn tick(&mut self, intents: &InputIntents, log: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.controls.handle(intents, false, &mut commands);
        commands.push(Command::Tick {
            dt: self.tick_duration,
        });
        self.execute(commands, log);

        let mut commands = Vec::new();
        self.collision
            .handle(&query::combat_view(&self.world), &mut commands);
        self.execute(commands, log);
    }

    /// Applies `commands` and pumps the reactive systems until they go quiet.
    fn execute(&mut self, commands: Vec<Command>, log: &mut Vec<Event>) {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        while !events.is_empty() {
            let playfield = query::playfield(&self.world);
            let mut commands = Vec::new();
            self.waves.handle(
                &events,
                &playfield,
                query::live_enemy_count(&self.world),
                query::boss_alive(&self.world),
                &mut commands,
            );
            self.drops.handle(&events, &playfield, &mut commands);
            log.append(&mut events);
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}

/// Derives an independent seed for a system from the session seed.
fn stream_seed(seed: u64, stream: u64) -> u64 {
    seed ^ stream.wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_streams_do_not_share_seeds() {
        let seed = 42;
        assert_ne!(stream_seed(seed, WAVES_STREAM), seed);
        assert_ne!(
            stream_seed(seed, WAVES_STREAM),
            stream_seed(seed, DROPS_STREAM)
        );
    }

    #[test]
    fn zero_tick_duration_is_ignored() {
        let config = Config::new(1, Playfield::default()).with_tick_duration(Duration::ZERO);
        assert_eq!(config.tick_duration, TICK_DURATION);
    }

    #[test]
    fn new_session_configures_the_playfield() {
        let session = Session::new(Config::new(1, Playfield::new(640.0, 480.0)));
        assert_eq!(query::playfield(session.world()), Playfield::new(640.0, 480.0));
        assert_eq!(query::tick(session.world()), 0);
    }
}
