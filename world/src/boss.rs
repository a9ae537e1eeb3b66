//! Boss state machine: movement phases, attack patterns, firing, minion
//! waves, shield upkeep, the charged special attack and health milestones.
//!
//! The boss never touches the rest of the world directly. Each tick it
//! receives a [`BossContext`] and reports what it wants to happen through
//! [`BossAction`] values that the world then carries out.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use starfall_core::{
    strike, Aabb, AttackPattern, BossId, BossMilestone, BossPhase, BossSnapshot, DifficultyScale,
    EnemyKind, HitOutcome, Hull, Playfield, Shield, SpecialAttackKind, SpecialAttackState,
};

use crate::projectile::{HostileProjectile, Shot};

const SIZE: Vec2 = Vec2::new(150.0, 120.0);
const BASE_SPEED: f32 = 2.5;
const ENTRY_FACTOR: f32 = 1.5;
const TARGET_Y: f32 = 100.0;
const ATTACK_TICKS: u32 = 300;
const COOLDOWN_TICKS: u32 = 120;
const COOLDOWN_SWAY: f32 = 20.0;
const FLASH_TICKS: u32 = 8;
const SHIELD_RECHARGE_DELAY: u32 = 300;
const SHIELD_RECHARGE_FRACTION: f32 = 0.3;
const SPECIAL_COOLDOWN: u32 = 500;
const SPECIAL_TRIGGER_RATIO: f32 = 0.5;
const CHARGE_MAX: u32 = 100;
const CHARGE_RATE: u32 = 2;
const CHARGE_SPEED_FACTOR: f32 = 0.3;
const LASER_STAGES: u32 = 8;
/// Ticks between consecutive laser stages.
pub(crate) const LASER_STAGE_DELAY: u64 = 6;
/// Ticks between a radial burst and the minion wave that follows it.
pub(crate) const RADIAL_MINION_DELAY: u64 = 18;

/// Inputs the boss may read while advancing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BossContext {
    pub(crate) player_center: Vec2,
    pub(crate) playfield: Playfield,
}

/// Effects requested by the boss while advancing.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum BossAction {
    PhaseChanged(BossPhase),
    Fire(Shot),
    Minion { kind: EnemyKind, position: Vec2 },
    MinionsSummoned { count: u32, unscathed: bool },
    ShieldRecharged,
    ChargeStarted,
    ChargeSpark { position: Vec2, size: f32 },
    Released(SpecialAttackKind),
    Explosion { position: Vec2, size: f32 },
    DelayedMinions { delay: u64 },
    LaserStage { delay: u64, position: Vec2, final_stage: bool },
}

/// Reactions triggered by a hit that the world turns into signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BossReaction {
    ShieldBroken,
    Milestone(BossMilestone),
}

#[derive(Debug)]
pub(crate) struct Boss {
    pub(crate) id: BossId,
    pub(crate) level: u32,
    pub(crate) bounds: Aabb,
    pub(crate) hull: Hull,
    pub(crate) shield: Option<Shield>,
    pub(crate) score: u32,
    pub(crate) projectiles: Vec<HostileProjectile>,
    pub(crate) marked: bool,
    phase: BossPhase,
    phase_timer: u32,
    pattern_clock: f32,
    pattern: AttackPattern,
    anchor_x: f32,
    cruise_speed: f32,
    entry_speed: f32,
    wave_frequency: f32,
    fire_interval: f32,
    fire_timer: f32,
    minion_interval: u32,
    minion_timer: u32,
    special: SpecialAttackState,
    special_timer: u32,
    special_ready: bool,
    charge: u32,
    milestones: Vec<BossMilestone>,
    flash: u32,
}

impl Boss {
    pub(crate) fn new(id: BossId, level: u32, playfield: &Playfield) -> Self {
        let level = level.max(1);
        let levelf = level as f32;
        let speed = BASE_SPEED * (1.0 + levelf * 0.15);
        let origin = Vec2::new(playfield.width() * 0.5 - SIZE.x * 0.5, -150.0);
        Self {
            id,
            level,
            bounds: Aabb::new(origin, SIZE),
            hull: Hull::new(600 + 360 * level),
            shield: (level >= 2).then(|| Shield::new(250 * level)),
            score: 800 * level,
            projectiles: Vec::new(),
            marked: false,
            phase: BossPhase::Entering,
            phase_timer: 0,
            pattern_clock: 0.0,
            pattern: AttackPattern::Sweep,
            anchor_x: origin.x,
            cruise_speed: speed,
            entry_speed: speed * ENTRY_FACTOR,
            wave_frequency: 0.007 * (1.0 + levelf * 0.12),
            fire_interval: (25.0 - levelf * 3.0).max(8.0),
            fire_timer: 0.0,
            minion_interval: 300u32.saturating_sub(30 * level).max(120),
            minion_timer: 0,
            special: SpecialAttackState::Idle,
            special_timer: SPECIAL_COOLDOWN / 2,
            special_ready: false,
            charge: 0,
            milestones: Vec::new(),
            flash: 0,
        }
    }

    pub(crate) fn phase(&self) -> BossPhase {
        self.phase
    }

    pub(crate) fn pattern(&self) -> AttackPattern {
        self.pattern
    }

    pub(crate) fn special_state(&self) -> SpecialAttackState {
        self.special
    }

    pub(crate) fn charge(&self) -> u32 {
        self.charge
    }

    pub(crate) fn fire_interval(&self) -> f32 {
        self.fire_interval
    }

    /// Movement speed currently in effect; charging slows the boss down.
    pub(crate) fn speed(&self) -> f32 {
        if self.charging() {
            BASE_SPEED * CHARGE_SPEED_FACTOR
        } else {
            self.cruise_speed
        }
    }

    fn charging(&self) -> bool {
        self.special == SpecialAttackState::Charging
    }

    /// How far the attack trajectories advance this tick.
    fn pace(&self) -> f32 {
        if self.charging() {
            CHARGE_SPEED_FACTOR
        } else {
            1.0
        }
    }

    pub(crate) fn advance<R: Rng>(
        &mut self,
        context: &BossContext,
        rng: &mut R,
        actions: &mut Vec<BossAction>,
    ) {
        for projectile in &mut self.projectiles {
            projectile.advance(&context.playfield);
        }

        if self.special == SpecialAttackState::Firing {
            self.special = SpecialAttackState::Idle;
        }

        self.advance_movement(context, rng, actions);
        self.advance_weapons(rng, actions);
        self.advance_special(context, rng, actions);

        if let Some(shield) = self.shield.as_mut() {
            if shield.advance_recharge(SHIELD_RECHARGE_DELAY, SHIELD_RECHARGE_FRACTION) {
                actions.push(BossAction::ShieldRecharged);
            }
        }

        self.flash = self.flash.saturating_sub(1);
    }

    fn advance_movement<R: Rng>(
        &mut self,
        context: &BossContext,
        rng: &mut R,
        actions: &mut Vec<BossAction>,
    ) {
        let max_x = (context.playfield.width() - self.bounds.size.x).max(0.0);
        match self.phase {
            BossPhase::Entering => {
                self.bounds.origin.y += self.entry_speed;
                if self.bounds.origin.y >= TARGET_Y {
                    self.bounds.origin.y = TARGET_Y;
                    self.pattern = AttackPattern::from_index(rng.gen_range(0..3));
                    self.enter_phase(BossPhase::Attack, actions);
                }
            }
            BossPhase::Attack => {
                self.phase_timer += 1;
                self.pattern_clock += self.pace();
                let t = self.pattern_clock;
                let amplitude = context.playfield.width() / 3.0;
                match self.pattern {
                    AttackPattern::Sweep => {
                        self.bounds.origin.x =
                            self.anchor_x + (t * self.wave_frequency).sin() * amplitude;
                    }
                    AttackPattern::FigureEight => {
                        let phase = t * self.wave_frequency;
                        self.bounds.origin.x =
                            self.anchor_x + (phase * 2.0).sin() * amplitude * 0.7;
                        self.bounds.origin.y = TARGET_Y + phase.sin() * 50.0;
                    }
                    AttackPattern::Chase => {
                        let center_x = self.bounds.center().x;
                        let gap = context.player_center.x - center_x;
                        if gap.abs() > self.speed() * 2.0 {
                            self.bounds.origin.x += self.speed() * 0.5 * gap.signum();
                        }
                        self.bounds.origin.y = TARGET_Y + (t * 0.02).sin() * 30.0;
                    }
                }
                self.bounds.origin.x = self.bounds.origin.x.clamp(0.0, max_x);

                if self.phase_timer >= ATTACK_TICKS {
                    self.enter_phase(BossPhase::Cooldown, actions);
                }
            }
            BossPhase::Cooldown => {
                let t = self.pattern_clock;
                self.bounds.origin.x = self.anchor_x + (t * 0.01).sin() * COOLDOWN_SWAY;
                self.phase_timer += 1;
                self.pattern_clock += self.pace();
                if self.phase_timer >= COOLDOWN_TICKS {
                    self.pattern = self.pattern.next();
                    self.anchor_x = self.bounds.origin.x;
                    self.enter_phase(BossPhase::Attack, actions);
                }
            }
        }
    }

    fn enter_phase(&mut self, phase: BossPhase, actions: &mut Vec<BossAction>) {
        self.phase = phase;
        self.phase_timer = 0;
        self.pattern_clock = 0.0;
        actions.push(BossAction::PhaseChanged(phase));
    }

    fn advance_weapons<R: Rng>(&mut self, rng: &mut R, actions: &mut Vec<BossAction>) {
        self.fire_timer += 1.0;
        if self.phase == BossPhase::Attack && self.fire_timer >= self.fire_interval {
            self.fire_volley(actions);
            self.fire_timer = 0.0;
        }

        if self.phase == BossPhase::Attack {
            self.minion_timer += 1;
            if self.minion_timer >= self.minion_interval {
                self.summon_minions(rng, actions);
                self.minion_timer = 0;
            }
        }
    }

    fn projectile_speed(&self) -> f32 {
        6.0 + self.level as f32
    }

    fn fire_volley(&self, actions: &mut Vec<BossAction>) {
        let muzzle = Vec2::new(
            self.bounds.center().x,
            self.bounds.origin.y + self.bounds.size.y,
        );
        let speed = self.projectile_speed();
        let size = 6.0 + self.level as f32;
        let mut shoot = |offset_x: f32, velocity: Vec2| {
            actions.push(BossAction::Fire(Shot {
                position: muzzle + Vec2::new(offset_x, 0.0),
                velocity,
                size,
            }));
        };

        match self.level {
            1 => {
                for (offset, drift) in [(0.0, 0.0), (-20.0, -0.8), (20.0, 0.8)] {
                    shoot(offset, Vec2::new(drift, speed));
                }
            }
            2 => {
                for (offset, drift) in [
                    (0.0, 0.0),
                    (-15.0, -0.5),
                    (15.0, 0.5),
                    (-30.0, -1.0),
                    (30.0, 1.0),
                ] {
                    shoot(offset, Vec2::new(drift, speed));
                }
            }
            3 => {
                for step in -3i32..=3 {
                    let step = step as f32;
                    shoot(step * 12.0, Vec2::new(step * 0.4, speed));
                }
            }
            _ => {
                for index in 0..16 {
                    let angle = index as f32 * PI / 8.0;
                    shoot(
                        0.0,
                        Vec2::new(angle.sin(), angle.cos()) * speed * 0.8,
                    );
                }
            }
        }
    }

    /// Spawns the level-scaled minion wave around the boss.
    pub(crate) fn summon_minions<R: Rng>(&self, rng: &mut R, actions: &mut Vec<BossAction>) {
        let count = (1 + self.level / 2).min(4);
        let center_x = self.bounds.center().x;
        for _ in 0..count {
            let offset_x = (rng.gen::<f32>() - 0.5) * self.bounds.size.x;
            let position = Vec2::new(
                center_x + offset_x,
                self.bounds.origin.y + self.bounds.size.y * 0.8,
            );
            let roll = rng.gen::<f32>();
            let kind = if self.level >= 3 {
                if roll < 0.2 {
                    EnemyKind::Large
                } else if roll < 0.6 {
                    EnemyKind::Medium
                } else {
                    EnemyKind::Small
                }
            } else if self.level >= 2 && roll < 0.5 {
                EnemyKind::Medium
            } else {
                EnemyKind::Small
            };
            actions.push(BossAction::Minion { kind, position });
        }
        actions.push(BossAction::MinionsSummoned {
            count,
            unscathed: self.hull.health() == self.hull.max(),
        });
    }

    /// Scaling applied to every minion this boss summons.
    pub(crate) fn minion_scale(&self) -> DifficultyScale {
        DifficultyScale::for_minion(self.level)
    }

    fn advance_special<R: Rng>(
        &mut self,
        context: &BossContext,
        rng: &mut R,
        actions: &mut Vec<BossAction>,
    ) {
        self.special_timer += 1;
        if self.special_timer >= SPECIAL_COOLDOWN {
            self.special_ready = true;
        }
        if self.special_ready
            && self.hull.ratio() < SPECIAL_TRIGGER_RATIO
            && self.special != SpecialAttackState::Charging
        {
            self.special = SpecialAttackState::Charging;
            self.special_ready = false;
            self.special_timer = 0;
            self.charge = 0;
            actions.push(BossAction::ChargeStarted);
        }

        if self.special != SpecialAttackState::Charging {
            return;
        }

        self.charge += CHARGE_RATE;
        if rng.gen::<f32>() < 0.3 {
            let angle = rng.gen::<f32>() * TAU;
            let distance = rng.gen_range(30.0..80.0);
            actions.push(BossAction::ChargeSpark {
                position: self.bounds.center() + Vec2::new(angle.cos(), angle.sin()) * distance,
                size: rng.gen_range(5.0..15.0),
            });
        }

        if self.charge >= CHARGE_MAX {
            self.release_special(context, actions);
        }
    }

    fn release_special(&mut self, context: &BossContext, actions: &mut Vec<BossAction>) {
        self.special = SpecialAttackState::Firing;
        self.charge = 0;

        if self.level <= 2 {
            let center = self.bounds.center();
            let count = 24 + self.level * 4;
            let speed = self.projectile_speed() * 1.5;
            let size = 8.0 + self.level as f32;
            for index in 0..count {
                let angle = TAU / count as f32 * index as f32;
                actions.push(BossAction::Fire(Shot {
                    position: center,
                    velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                    size,
                }));
            }
            actions.push(BossAction::Explosion {
                position: center,
                size: 100.0,
            });
            actions.push(BossAction::Released(SpecialAttackKind::RadialBurst));
            if self.level >= 2 {
                actions.push(BossAction::DelayedMinions {
                    delay: RADIAL_MINION_DELAY,
                });
            }
        } else {
            let muzzle = Vec2::new(
                self.bounds.center().x,
                self.bounds.origin.y + self.bounds.size.y,
            );
            let path = context.player_center - muzzle;
            for stage in 1..=LASER_STAGES {
                actions.push(BossAction::LaserStage {
                    delay: LASER_STAGE_DELAY * u64::from(stage),
                    position: muzzle + path * (stage as f32 / LASER_STAGES as f32),
                    final_stage: stage == LASER_STAGES,
                });
            }
            actions.push(BossAction::Released(SpecialAttackKind::LaserBlast));
        }
    }

    /// Applies a hit. An active shield swallows the whole blow.
    pub(crate) fn hit(&mut self, damage: u32, reactions: &mut Vec<BossReaction>) -> HitOutcome {
        let shield_was_up = self.shield.map_or(false, |shield| shield.is_up());
        let outcome = strike(&mut self.hull, self.shield.as_mut(), damage);
        if outcome == HitOutcome::Blocked {
            if shield_was_up && self.shield.map_or(false, |shield| shield.is_broken()) {
                reactions.push(BossReaction::ShieldBroken);
            }
            return outcome;
        }

        self.flash = FLASH_TICKS;
        self.check_milestones(reactions);
        if outcome == HitOutcome::Killed {
            self.marked = true;
        }
        outcome
    }

    /// Removes health directly, ignoring the shield.
    pub(crate) fn drain(&mut self, amount: u32, reactions: &mut Vec<BossReaction>) -> HitOutcome {
        self.flash = FLASH_TICKS;
        let outcome = self.hull.damage(amount);
        self.check_milestones(reactions);
        if outcome == HitOutcome::Killed {
            self.marked = true;
        }
        outcome
    }

    fn check_milestones(&mut self, reactions: &mut Vec<BossReaction>) {
        let ratio = self.hull.ratio();
        for milestone in BossMilestone::ALL {
            if ratio > milestone.threshold() || self.milestones.contains(&milestone) {
                continue;
            }
            self.milestones.push(milestone);
            match milestone {
                BossMilestone::Damaged => {}
                BossMilestone::Enraged => {
                    self.cruise_speed *= 1.3;
                    self.fire_interval = (self.fire_interval * 0.7).max(8.0);
                }
                BossMilestone::Critical => {
                    self.cruise_speed *= 1.2;
                    self.fire_interval = (self.fire_interval * 0.8).max(5.0);
                }
            }
            reactions.push(BossReaction::Milestone(milestone));
        }
    }

    pub(crate) fn snapshot(&self) -> BossSnapshot {
        BossSnapshot {
            id: self.id,
            level: self.level,
            bounds: self.bounds,
            hull: self.hull,
            shield: self.shield,
            phase: self.phase,
        }
    }
}
