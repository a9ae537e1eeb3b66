#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Power-up drop system: loot rolls for kills, boss spoils and ambient drops.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use starfall_core::{Command, DestroyCause, Event, Playfield, PowerUpKind};

/// Chance that an enemy shot down by a projectile drops a power-up.
pub const PROJECTILE_DROP_CHANCE: f32 = 0.2;
/// Chance that an enemy destroyed by ramming drops a power-up.
pub const RAM_DROP_CHANCE: f32 = 0.3;
/// Ticks between ambient power-up drops from the top edge.
pub const AMBIENT_INTERVAL: u32 = 450;

const POWER_UP_WIDTH: f32 = 20.0;
const AMBIENT_HEIGHT: f32 = -30.0;

/// Configuration parameters required to construct the drops system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration whose rolls derive from `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits power-up spawn commands.
#[derive(Debug)]
pub struct Drops {
    seed: u64,
    rng: ChaCha8Rng,
    ambient_timer: u32,
}

impl Drops {
    /// Creates a drops system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            seed: config.rng_seed,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            ambient_timer: 0,
        }
    }

    /// Consumes world events and emits power-up spawns.
    pub fn handle(&mut self, events: &[Event], playfield: &Playfield, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::SessionReset => {
                    self.rng = ChaCha8Rng::seed_from_u64(self.seed);
                    self.ambient_timer = 0;
                }
                Event::EnemyDestroyed { center, cause, .. } => {
                    let chance = match cause {
                        DestroyCause::Projectile => PROJECTILE_DROP_CHANCE,
                        DestroyCause::Ram => RAM_DROP_CHANCE,
                        _ => continue,
                    };
                    if self.rng.gen::<f32>() < chance {
                        out.push(Command::SpawnPowerUp {
                            kind: self.weighted_kind(),
                            position: Vec2::new(center.x - POWER_UP_WIDTH * 0.5, center.y),
                        });
                    }
                }
                Event::SpoilsDropped { position } => out.push(Command::SpawnPowerUp {
                    kind: self.weighted_kind(),
                    position: *position,
                }),
                Event::TimeAdvanced { .. } => {
                    self.ambient_timer += 1;
                    if self.ambient_timer >= AMBIENT_INTERVAL {
                        self.ambient_timer = 0;
                        out.push(self.ambient_drop(playfield));
                    }
                }
                _ => {}
            }
        }
    }

    fn weighted_kind(&mut self) -> PowerUpKind {
        weighted_kind(self.rng.gen::<f32>())
    }

    fn ambient_drop(&mut self, playfield: &Playfield) -> Command {
        let kind = PowerUpKind::ALL[self.rng.gen_range(0..PowerUpKind::ALL.len())];
        let span = (playfield.width() - POWER_UP_WIDTH).max(0.0);
        let x = self.rng.gen::<f32>() * span;
        Command::SpawnPowerUp {
            kind,
            position: Vec2::new(x, AMBIENT_HEIGHT),
        }
    }
}

/// Maps a roll in `[0, 1)` onto the weighted drop table.
///
/// The roll is scaled to the total weight and the first kind whose cumulative
/// weight reaches it wins.
#[must_use]
pub fn weighted_kind(roll: f32) -> PowerUpKind {
    let total: u32 = PowerUpKind::ALL.iter().map(|kind| kind.drop_weight()).sum();
    let draw = roll.clamp(0.0, 1.0) * total as f32;
    let mut cumulative = 0.0;
    for kind in PowerUpKind::ALL {
        cumulative += kind.drop_weight() as f32;
        if draw <= cumulative {
            return kind;
        }
    }
    PowerUpKind::Double
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use starfall_core::{EnemyId, EnemyKind};

    use super::*;

    fn destroyed(cause: DestroyCause) -> Event {
        Event::EnemyDestroyed {
            enemy: EnemyId::new(1),
            kind: EnemyKind::Small,
            center: Vec2::new(100.0, 200.0),
            cause,
        }
    }

    #[test]
    fn weighted_table_partitions_the_roll() {
        assert_eq!(weighted_kind(0.0), PowerUpKind::Double);
        assert_eq!(weighted_kind(19.5 / 129.0), PowerUpKind::Double);
        assert_eq!(weighted_kind(21.0 / 129.0), PowerUpKind::Triple);
        assert_eq!(weighted_kind(106.0 / 129.0), PowerUpKind::Godmode);
        assert_eq!(weighted_kind(0.999), PowerUpKind::Missile);
    }

    #[test]
    fn spoils_always_drop() {
        let mut drops = Drops::new(Config::new(1));
        let mut out = Vec::new();
        let spoils = Event::SpoilsDropped {
            position: Vec2::new(40.0, 60.0),
        };
        drops.handle(&[spoils.clone(), spoils], &Playfield::default(), &mut out);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|command| matches!(
            command,
            Command::SpawnPowerUp { position, .. } if *position == Vec2::new(40.0, 60.0)
        )));
    }

    #[test]
    fn only_projectile_and_ram_kills_roll_for_loot() {
        let mut drops = Drops::new(Config::new(9));
        let mut out = Vec::new();
        let cleared: Vec<_> = (0..200)
            .map(|_| destroyed(DestroyCause::WaveCleared))
            .chain((0..200).map(|_| destroyed(DestroyCause::Nuke)))
            .collect();
        drops.handle(&cleared, &Playfield::default(), &mut out);
        assert!(out.is_empty());

        let shot: Vec<_> = (0..1_000)
            .map(|_| destroyed(DestroyCause::Projectile))
            .collect();
        drops.handle(&shot, &Playfield::default(), &mut out);
        assert!((120..280).contains(&out.len()), "drops: {}", out.len());
        assert!(matches!(
            out[0],
            Command::SpawnPowerUp { position, .. } if position == Vec2::new(90.0, 200.0)
        ));
    }

    #[test]
    fn ambient_drop_every_interval() {
        let mut drops = Drops::new(Config::new(4));
        let tick = Event::TimeAdvanced {
            tick: 1,
            dt: Duration::from_millis(16),
        };
        let mut out = Vec::new();
        for _ in 0..AMBIENT_INTERVAL - 1 {
            drops.handle(&[tick.clone()], &Playfield::default(), &mut out);
        }
        assert!(out.is_empty());
        drops.handle(&[tick], &Playfield::default(), &mut out);
        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0],
            Command::SpawnPowerUp { position, .. }
                if position.y == AMBIENT_HEIGHT && (0.0..780.0).contains(&position.x)
        ));
    }
}
