use glam::Vec2;
use starfall_core::{Aabb, Hull, Playfield, PlayerSnapshot, TimedEffect};

use crate::arsenal::Arsenal;

const SIZE: Vec2 = Vec2::new(36.0, 48.0);
const BOTTOM_MARGIN: f32 = 20.0;
const MAX_HEALTH: u32 = 100;
const HIT_DAMAGE: u32 = 20;
const STARTING_LIVES: u32 = 3;
const HIT_INVULNERABILITY: u32 = 60;
const ROLL_TARGET: f32 = 0.3;
const EDGE_BOUNCE: f32 = 0.5;
const UPWARD_SPEED_FACTOR: f32 = 1.5;

/// Ticks a timed power-up effect lasts.
pub(crate) const EFFECT_TICKS: u32 = 600;
pub(crate) const MAX_NUKES: u32 = 3;
pub(crate) const NUKE_COOLDOWN: u32 = 30;
pub(crate) const MAX_MISSILES: u32 = 20;
pub(crate) const MISSILE_COOLDOWN: u32 = 60;
pub(crate) const MISSILES_PER_SALVO: u32 = 5;

/// Momentum-model tuning that power-ups adjust.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Handling {
    pub(crate) max_speed: f32,
    pub(crate) acceleration: f32,
    pub(crate) deceleration: f32,
    pub(crate) roll_speed: f32,
}

impl Handling {
    const STOCK: Self = Self {
        max_speed: 8.0,
        acceleration: 0.4,
        deceleration: 0.08,
        roll_speed: 0.15,
    };

    fn add(&mut self, delta: Handling) {
        self.max_speed += delta.max_speed;
        self.acceleration += delta.acceleration;
        self.deceleration += delta.deceleration;
        self.roll_speed += delta.roll_speed;
    }

    fn remove(&mut self, delta: Handling) {
        self.max_speed -= delta.max_speed;
        self.acceleration -= delta.acceleration;
        self.deceleration -= delta.deceleration;
        self.roll_speed -= delta.roll_speed;
    }
}

/// Temporary handling change that reverts exactly its own delta.
#[derive(Clone, Copy, Debug)]
struct Boost {
    remaining: u32,
    delta: Handling,
}

/// Result of a hit that got through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Wound {
    pub(crate) life_lost: bool,
    pub(crate) game_over: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) bounds: Aabb,
    pub(crate) velocity: Vec2,
    pub(crate) hull: Hull,
    pub(crate) lives: u32,
    pub(crate) arsenal: Arsenal,
    pub(crate) nukes: u32,
    pub(crate) nuke_cooldown: u32,
    pub(crate) missiles: u32,
    pub(crate) missile_cooldown: u32,
    invulnerable_for: u32,
    godmode: bool,
    steer: Vec2,
    handling: Handling,
    roll: f32,
    agility: Option<Boost>,
    thrust: Option<Boost>,
}

impl Player {
    pub(crate) fn new(playfield: &Playfield) -> Self {
        let origin = Vec2::new(
            playfield.width() * 0.5 - SIZE.x * 0.5,
            playfield.height() - SIZE.y - BOTTOM_MARGIN,
        );
        Self {
            bounds: Aabb::new(origin, SIZE),
            velocity: Vec2::ZERO,
            hull: Hull::new(MAX_HEALTH),
            lives: STARTING_LIVES,
            arsenal: Arsenal::default(),
            nukes: 0,
            nuke_cooldown: 0,
            missiles: 0,
            missile_cooldown: 0,
            invulnerable_for: 0,
            godmode: false,
            steer: Vec2::ZERO,
            handling: Handling::STOCK,
            roll: 0.0,
            agility: None,
            thrust: None,
        }
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    pub(crate) fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0
    }

    pub(crate) fn godmode(&self) -> bool {
        self.godmode
    }

    pub(crate) fn handling(&self) -> Handling {
        self.handling
    }

    pub(crate) fn roll(&self) -> f32 {
        self.roll
    }

    pub(crate) fn effect_remaining(&self, effect: TimedEffect) -> Option<u32> {
        match effect {
            TimedEffect::Agility => self.agility.map(|boost| boost.remaining),
            TimedEffect::Thrust => self.thrust.map(|boost| boost.remaining),
            TimedEffect::Godmode => self.godmode.then_some(self.invulnerable_for),
        }
    }

    pub(crate) fn steer(&mut self, axis: Vec2) {
        self.steer = axis.clamp(Vec2::splat(-1.0), Vec2::ONE);
    }

    /// Moves the craft one tick and counts down every timer.
    pub(crate) fn advance(&mut self, playfield: &Playfield, expired: &mut Vec<TimedEffect>) {
        let handling = self.handling;

        let target_roll = if self.steer.x != 0.0 {
            self.velocity.x += handling.acceleration * self.steer.x;
            ROLL_TARGET * self.steer.x.signum()
        } else {
            self.velocity.x *= 1.0 - handling.deceleration;
            0.0
        };
        if self.steer.y != 0.0 {
            self.velocity.y += handling.acceleration * self.steer.y;
        } else {
            self.velocity.y -= self.velocity.y * handling.deceleration;
        }
        self.roll += (target_roll - self.roll) * handling.roll_speed;

        self.velocity.x = self
            .velocity
            .x
            .clamp(-handling.max_speed, handling.max_speed);
        self.velocity.y = self.velocity.y.clamp(
            -handling.max_speed * UPWARD_SPEED_FACTOR,
            handling.max_speed,
        );
        self.bounds.origin += self.velocity;

        let max = Vec2::new(
            (playfield.width() - SIZE.x).max(0.0),
            (playfield.height() - SIZE.y).max(0.0),
        );
        if self.bounds.origin.x < 0.0 || self.bounds.origin.x > max.x {
            self.bounds.origin.x = self.bounds.origin.x.clamp(0.0, max.x);
            self.velocity.x = -self.velocity.x * EDGE_BOUNCE;
        }
        if self.bounds.origin.y < 0.0 || self.bounds.origin.y > max.y {
            self.bounds.origin.y = self.bounds.origin.y.clamp(0.0, max.y);
            self.velocity.y = -self.velocity.y * EDGE_BOUNCE;
        }

        if self.invulnerable_for > 0 {
            self.invulnerable_for -= 1;
            if self.invulnerable_for == 0 && self.godmode {
                self.godmode = false;
                expired.push(TimedEffect::Godmode);
            }
        }
        if tick_boost(&mut self.agility, &mut self.handling) {
            expired.push(TimedEffect::Agility);
        }
        if tick_boost(&mut self.thrust, &mut self.handling) {
            expired.push(TimedEffect::Thrust);
        }

        self.nuke_cooldown = self.nuke_cooldown.saturating_sub(1);
        self.missile_cooldown = self.missile_cooldown.saturating_sub(1);
        self.arsenal.cool_down();
    }

    /// Applies a fixed-damage hit unless the craft is invulnerable.
    pub(crate) fn hit(&mut self) -> Option<Wound> {
        if self.is_invulnerable() {
            return None;
        }

        let mut wound = Wound {
            life_lost: false,
            game_over: false,
        };
        let _ = self.hull.damage(HIT_DAMAGE);
        if self.hull.is_destroyed() {
            self.hull.refill();
            self.lives = self.lives.saturating_sub(1);
            wound.life_lost = true;
            wound.game_over = self.lives == 0;
        }
        self.invulnerable_for = HIT_INVULNERABILITY;
        Some(wound)
    }

    pub(crate) fn heal(&mut self, amount: u32) {
        self.hull.heal(amount, MAX_HEALTH);
    }

    pub(crate) fn raise_top_speed(&mut self, amount: f32) {
        self.handling.max_speed += amount;
    }

    pub(crate) fn grant_agility(&mut self) {
        let stock = self.revert(TimedEffect::Agility);
        let delta = Handling {
            roll_speed: (stock.roll_speed * 1.4).min(0.4) - stock.roll_speed,
            deceleration: (stock.deceleration * 1.3).min(0.2) - stock.deceleration,
            ..Handling::default()
        };
        self.handling.add(delta);
        self.agility = Some(Boost {
            remaining: EFFECT_TICKS,
            delta,
        });
    }

    pub(crate) fn grant_thrust(&mut self) {
        let stock = self.revert(TimedEffect::Thrust);
        let delta = Handling {
            acceleration: (stock.acceleration * 1.3).min(0.9) - stock.acceleration,
            max_speed: 2.0,
            ..Handling::default()
        };
        self.handling.add(delta);
        self.thrust = Some(Boost {
            remaining: EFFECT_TICKS,
            delta,
        });
    }

    pub(crate) fn grant_godmode(&mut self) {
        self.godmode = true;
        self.invulnerable_for = self.invulnerable_for.max(EFFECT_TICKS);
    }

    /// Undoes an active boost so it can be re-applied, returning the handling without it.
    fn revert(&mut self, effect: TimedEffect) -> Handling {
        let slot = match effect {
            TimedEffect::Agility => &mut self.agility,
            TimedEffect::Thrust => &mut self.thrust,
            TimedEffect::Godmode => return self.handling,
        };
        if let Some(boost) = slot.take() {
            self.handling.remove(boost.delta);
        }
        self.handling
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            bounds: self.bounds,
            velocity: self.velocity,
            invulnerable: self.is_invulnerable(),
            health: self.hull.health(),
            lives: self.lives,
            weapon: self.arsenal.equipped(),
        }
    }
}

fn tick_boost(slot: &mut Option<Boost>, handling: &mut Handling) -> bool {
    let Some(boost) = slot.as_mut() else {
        return false;
    };
    boost.remaining = boost.remaining.saturating_sub(1);
    if boost.remaining > 0 {
        return false;
    }
    handling.remove(boost.delta);
    *slot = None;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&Playfield::new(800.0, 600.0))
    }

    #[test]
    fn spawns_centred_above_bottom_edge() {
        let player = player();
        assert_eq!(player.bounds.origin, Vec2::new(382.0, 532.0));
    }

    #[test]
    fn hits_respect_invulnerability_window() {
        let mut player = player();
        let mut expired = Vec::new();
        assert!(player.hit().is_some());
        assert_eq!(player.hull.health(), 80);
        assert!(player.hit().is_none());
        for _ in 0..HIT_INVULNERABILITY {
            player.advance(&Playfield::new(800.0, 600.0), &mut expired);
        }
        assert!(player.hit().is_some());
        assert_eq!(player.hull.health(), 60);
    }

    #[test]
    fn losing_last_life_is_game_over() {
        let mut player = player();
        let mut last = None;
        for _ in 0..15 {
            player.invulnerable_for = 0;
            last = player.hit();
        }
        assert_eq!(player.lives, 0);
        assert_eq!(
            last,
            Some(Wound {
                life_lost: true,
                game_over: true
            })
        );
        assert_eq!(player.hull.health(), MAX_HEALTH);
    }

    #[test]
    fn thrust_reverts_exactly_its_own_delta() {
        let playfield = Playfield::new(800.0, 600.0);
        let mut player = player();
        let mut expired = Vec::new();
        player.grant_thrust();
        player.raise_top_speed(1.0);
        assert_eq!(player.handling().max_speed, 11.0);

        for _ in 0..EFFECT_TICKS {
            player.advance(&playfield, &mut expired);
        }
        assert_eq!(expired, vec![TimedEffect::Thrust]);
        assert_eq!(player.handling().max_speed, 9.0);
        assert!((player.handling().acceleration - 0.4).abs() < 1e-6);
    }

    #[test]
    fn repeated_agility_refreshes_instead_of_stacking() {
        let mut player = player();
        player.grant_agility();
        let boosted = player.handling();
        player.grant_agility();
        assert!((player.handling().roll_speed - boosted.roll_speed).abs() < 1e-6);
        assert!((boosted.roll_speed - 0.21).abs() < 1e-6);
        assert!((boosted.deceleration - 0.104).abs() < 1e-6);
    }

    #[test]
    fn steering_is_capped_and_bounces_off_edges() {
        let playfield = Playfield::new(800.0, 600.0);
        let mut player = player();
        let mut expired = Vec::new();
        player.steer(Vec2::new(1.0, 0.0));
        for _ in 0..200 {
            player.advance(&playfield, &mut expired);
            assert!(player.velocity.x.abs() <= 8.0);
        }
        assert!(player.bounds.origin.x <= 800.0 - 36.0);
    }

    #[test]
    fn godmode_expires_with_its_window() {
        let playfield = Playfield::new(800.0, 600.0);
        let mut player = player();
        let mut expired = Vec::new();
        player.grant_godmode();
        assert!(player.hit().is_none());
        for _ in 0..EFFECT_TICKS {
            player.advance(&playfield, &mut expired);
        }
        assert_eq!(expired, vec![TimedEffect::Godmode]);
        assert!(!player.is_invulnerable());
    }
}
