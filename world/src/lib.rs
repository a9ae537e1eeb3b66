#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Starfall combat simulation.
//!
//! The world owns every entity collection and is the only place where
//! combat state changes. Callers submit [`Command`] values through [`apply`]
//! and observe the outcome as [`Event`] values; read-only views for pure
//! systems live in [`query`].

mod arsenal;
mod boss;
mod enemy;
mod missile;
mod player;
mod power_up;
mod projectile;
mod schedule;

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use starfall_core::{
    boss_ram_damage, enemy_ram_damage, is_boss_wave, BossId, BossMilestone, Color, Command,
    DestroyCause, DifficultyScale, EnemyId, EnemyKind, Event, HitOutcome, HostileProjectileId,
    MissileId, MovementPattern, Playfield, PlayerAction, PowerUpId, ProjectileId,
    RejectionReason, SpecialAttackKind, TargetRef, WeaponKind,
};
use tracing::{debug, info};

use crate::{
    arsenal::{AmmoNotice, Trigger},
    boss::{Boss, BossAction, BossContext, BossReaction},
    enemy::Enemy,
    missile::{blast_damage, Flight, Missile, Quarry, DIRECT_DAMAGE},
    player::{Player, MISSILES_PER_SALVO, MISSILE_COOLDOWN, NUKE_COOLDOWN},
    power_up::PowerUp,
    projectile::{HostileProjectile, Projectile, Shot},
    schedule::{Schedule, ScheduledAction},
};

const DEFAULT_SEED: u64 = 0x5eed_57a2_f011_0001;

const NUKE_ENEMY_SCORE: u32 = 10;
const STAGGER_TICKS: u64 = 3;
const SPOILS_INTERVAL: u64 = 18;
const SPOILS_DROPS: u64 = 3;
const LASER_REACH: f32 = 50.0;

const RED: Color = Color::from_rgb(0xff, 0x00, 0x00);
const ALERT: Color = Color::from_rgb(0xff, 0x33, 0x33);
const ORANGE: Color = Color::from_rgb(0xff, 0x66, 0x00);
const AMBER: Color = Color::from_rgb(0xff, 0xaa, 0x00);
const GOLD: Color = Color::from_rgb(0xff, 0x99, 0x00);
const CYAN: Color = Color::from_rgb(0x00, 0xff, 0xff);
const GREEN: Color = Color::from_rgb(0x00, 0xff, 0x00);

/// Requests an on-screen notification.
pub(crate) fn notify(
    out_events: &mut Vec<Event>,
    text: impl Into<String>,
    color: Color,
    duration: u32,
) {
    out_events.push(Event::Notification {
        text: text.into(),
        color,
        duration,
    });
}

fn shake(out_events: &mut Vec<Event>, intensity: f32, duration: u32) {
    out_events.push(Event::ScreenShake {
        intensity,
        duration,
    });
}

/// Monotonic identifier counters; identifiers are never reused within a session.
#[derive(Debug, Default)]
struct Ids {
    enemy: u32,
    boss: u32,
    projectile: u32,
    hostile: u32,
    missile: u32,
    power_up: u32,
}

impl Ids {
    fn enemy(&mut self) -> EnemyId {
        let id = EnemyId::new(self.enemy);
        self.enemy = self.enemy.wrapping_add(1);
        id
    }

    fn boss(&mut self) -> BossId {
        let id = BossId::new(self.boss);
        self.boss = self.boss.wrapping_add(1);
        id
    }

    fn projectile(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.projectile);
        self.projectile = self.projectile.wrapping_add(1);
        id
    }

    fn hostile(&mut self) -> HostileProjectileId {
        let id = HostileProjectileId::new(self.hostile);
        self.hostile = self.hostile.wrapping_add(1);
        id
    }

    fn missile(&mut self) -> MissileId {
        let id = MissileId::new(self.missile);
        self.missile = self.missile.wrapping_add(1);
        id
    }

    fn power_up(&mut self) -> PowerUpId {
        let id = PowerUpId::new(self.power_up);
        self.power_up = self.power_up.wrapping_add(1);
        id
    }
}

fn hostile_projectile(id: HostileProjectileId, shot: Shot) -> HostileProjectile {
    HostileProjectile {
        id,
        position: shot.position,
        velocity: shot.velocity,
        size: shot.size,
        marked: false,
    }
}

/// Represents the authoritative combat state.
#[derive(Debug)]
pub struct World {
    playfield: Playfield,
    player: Player,
    enemies: Vec<Enemy>,
    boss: Option<Boss>,
    projectiles: Vec<Projectile>,
    missiles: Vec<Missile>,
    power_ups: Vec<PowerUp>,
    schedule: Schedule,
    ids: Ids,
    rng: ChaCha8Rng,
    seed: u64,
    tick: u64,
    score: u64,
    wave: u32,
    paused: bool,
    game_over: bool,
}

impl World {
    /// Creates a world on the default playfield with the default seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a world whose random rolls derive from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let playfield = Playfield::default();
        Self {
            player: Player::new(&playfield),
            playfield,
            enemies: Vec::new(),
            boss: None,
            projectiles: Vec::new(),
            missiles: Vec::new(),
            power_ups: Vec::new(),
            schedule: Schedule::default(),
            ids: Ids::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            tick: 0,
            score: 0,
            wave: 0,
            paused: false,
            game_over: false,
        }
    }

    fn reset(&mut self) {
        let playfield = self.playfield;
        *self = Self::with_seed(self.seed);
        self.playfield = playfield;
        self.player = Player::new(&playfield);
    }

    fn live_boss_mut(&mut self) -> Option<&mut Boss> {
        self.boss.as_mut().filter(|boss| !boss.marked)
    }

    fn live_enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies
            .iter_mut()
            .find(|enemy| enemy.id == id && !enemy.marked)
    }

    fn award(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        let amount = u64::from(amount);
        self.score = self.score.saturating_add(amount);
        out_events.push(Event::ScoreAwarded {
            amount,
            total: self.score,
        });
    }

    fn purge(&mut self) {
        self.enemies.retain(|enemy| !enemy.marked);
        for enemy in &mut self.enemies {
            enemy.projectiles.retain(|projectile| !projectile.marked);
        }
        if self.boss.as_ref().map_or(false, |boss| boss.marked) {
            self.boss = None;
        }
        if let Some(boss) = self.boss.as_mut() {
            boss.projectiles.retain(|projectile| !projectile.marked);
        }
        self.projectiles.retain(|projectile| !projectile.marked);
        self.missiles.retain(|missile| !missile.marked);
        self.power_ups.retain(|power_up| !power_up.marked);
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.purge();
        self.tick = self.tick.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick,
            dt,
        });

        for action in self.schedule.drain_due(self.tick) {
            self.run_scheduled(action, out_events);
        }

        let mut expired = Vec::new();
        self.player.advance(&self.playfield, &mut expired);
        for effect in expired {
            debug!(?effect, "timed effect expired");
            out_events.push(Event::EffectExpired { effect });
        }

        for projectile in &mut self.projectiles {
            projectile.advance(&self.playfield);
        }

        let player_x = self.player.center().x;
        for enemy in self.enemies.iter_mut().filter(|enemy| !enemy.marked) {
            if let Some(shot) = enemy.advance(player_x, &self.playfield) {
                enemy
                    .projectiles
                    .push(hostile_projectile(self.ids.hostile(), shot));
            }
            if enemy.has_escaped(&self.playfield) {
                enemy.marked = true;
                out_events.push(Event::EnemyEscaped { enemy: enemy.id });
            }
        }

        self.advance_boss(out_events);
        self.advance_missiles(out_events);

        for power_up in &mut self.power_ups {
            power_up.advance(&self.playfield);
        }
    }

    fn advance_boss(&mut self, out_events: &mut Vec<Event>) {
        let context = BossContext {
            player_center: self.player.center(),
            playfield: self.playfield,
        };
        let mut actions = Vec::new();
        let Some(boss) = self.boss.as_mut().filter(|boss| !boss.marked) else {
            return;
        };
        boss.advance(&context, &mut self.rng, &mut actions);
        self.carry_out(actions, out_events);
    }

    fn carry_out(&mut self, actions: Vec<BossAction>, out_events: &mut Vec<Event>) {
        let Some((boss_id, scale)) = self
            .boss
            .as_ref()
            .map(|boss| (boss.id, boss.minion_scale()))
        else {
            return;
        };

        for action in actions {
            match action {
                BossAction::PhaseChanged(phase) => {
                    debug!(boss = boss_id.get(), ?phase, "boss phase changed");
                    out_events.push(Event::BossPhaseChanged {
                        boss: boss_id,
                        phase,
                    });
                }
                BossAction::Fire(shot) => {
                    let id = self.ids.hostile();
                    if let Some(boss) = self.boss.as_mut() {
                        boss.projectiles.push(hostile_projectile(id, shot));
                    }
                }
                BossAction::Minion { kind, position } => {
                    self.spawn_enemy(kind, position, scale, None, out_events);
                }
                BossAction::MinionsSummoned { count, unscathed } => {
                    out_events.push(Event::MinionsSummoned {
                        boss: boss_id,
                        count,
                    });
                    if unscathed {
                        notify(out_events, "BOSS SUMMONS MINIONS!", ORANGE, 90);
                    }
                }
                BossAction::ShieldRecharged => {
                    out_events.push(Event::ShieldRecharged { boss: boss_id });
                    notify(out_events, "BOSS SHIELD RESTORED", CYAN, 90);
                }
                BossAction::ChargeStarted => {
                    debug!(boss = boss_id.get(), "boss charging special attack");
                    out_events.push(Event::SpecialAttackCharging { boss: boss_id });
                    notify(out_events, "BOSS CHARGING ATTACK!", RED, 120);
                    shake(out_events, 3.0, 30);
                }
                BossAction::ChargeSpark { position, size } => {
                    out_events.push(Event::HitEffect {
                        position,
                        size,
                        color: Color::from_rgb(0xff, 0x00, 0xff),
                    });
                }
                BossAction::Released(kind) => {
                    out_events.push(Event::SpecialAttackReleased {
                        boss: boss_id,
                        kind,
                    });
                    shake(out_events, 10.0, 30);
                    let text = match kind {
                        SpecialAttackKind::RadialBurst => "RADIAL BLAST!",
                        SpecialAttackKind::LaserBlast => "LASER BEAM!",
                    };
                    notify(out_events, text, RED, 60);
                }
                BossAction::Explosion { position, size } => {
                    out_events.push(Event::Explosion { position, size });
                }
                BossAction::DelayedMinions { delay } => {
                    self.schedule.push(
                        self.tick.saturating_add(delay),
                        ScheduledAction::Minions { boss: boss_id },
                    );
                }
                BossAction::LaserStage {
                    delay,
                    position,
                    final_stage,
                } => {
                    self.schedule.push(
                        self.tick.saturating_add(delay),
                        ScheduledAction::LaserStage {
                            position,
                            final_stage,
                        },
                    );
                }
            }
        }
    }

    fn run_scheduled(&mut self, action: ScheduledAction, out_events: &mut Vec<Event>) {
        match action {
            ScheduledAction::Explosion { position, size } => {
                out_events.push(Event::Explosion { position, size });
            }
            ScheduledAction::LaserStage {
                position,
                final_stage,
            } => {
                out_events.push(Event::HitEffect {
                    position,
                    size: 25.0,
                    color: RED,
                });
                if final_stage {
                    out_events.push(Event::Explosion {
                        position,
                        size: 60.0,
                    });
                    shake(out_events, 8.0, 20);
                    if self.player.center().distance(position) < LASER_REACH {
                        self.wound_player(out_events);
                    }
                }
            }
            ScheduledAction::Minions { boss } => {
                let mut actions = Vec::new();
                let Some(live) = self.boss.as_ref().filter(|live| live.id == boss && !live.marked)
                else {
                    return;
                };
                live.summon_minions(&mut self.rng, &mut actions);
                self.carry_out(actions, out_events);
            }
            ScheduledAction::Spoils { position } => {
                out_events.push(Event::SpoilsDropped { position });
            }
        }
    }

    fn advance_missiles(&mut self, out_events: &mut Vec<Event>) {
        if self.missiles.is_empty() {
            return;
        }

        let mut quarries: Vec<Quarry> = self
            .enemies
            .iter()
            .filter(|enemy| !enemy.marked)
            .map(|enemy| Quarry {
                target: TargetRef::Enemy(enemy.id),
                bounds: enemy.bounds,
            })
            .collect();
        if let Some(boss) = self.boss.as_ref().filter(|boss| !boss.marked) {
            quarries.push(Quarry {
                target: TargetRef::Boss(boss.id),
                bounds: boss.bounds,
            });
        }

        let mut detonations = Vec::new();
        for missile in self.missiles.iter_mut().filter(|missile| !missile.marked) {
            if let Flight::Detonated { struck } = missile.advance(&quarries, &self.playfield) {
                detonations.push((missile.id, missile.position(), struck));
            }
        }
        for (missile, position, struck) in detonations {
            self.detonate(missile, position, struck, out_events);
        }
    }

    fn detonate(
        &mut self,
        missile: MissileId,
        position: Vec2,
        struck: Option<TargetRef>,
        out_events: &mut Vec<Event>,
    ) {
        out_events.push(Event::Explosion {
            position,
            size: 30.0,
        });
        shake(out_events, 5.0, 15);

        match struck {
            Some(TargetRef::Enemy(enemy)) => {
                self.damage_enemy(enemy, DIRECT_DAMAGE, DestroyCause::Missile, out_events);
            }
            Some(TargetRef::Boss(boss)) => {
                if self.boss.as_ref().map_or(false, |live| live.id == boss) {
                    self.damage_boss(DIRECT_DAMAGE, false, out_events);
                }
            }
            None => {}
        }

        let splashed: Vec<(EnemyId, u32)> = self
            .enemies
            .iter()
            .filter(|enemy| !enemy.marked)
            .filter_map(|enemy| {
                let damage = blast_damage(enemy.bounds.center().distance(position))?;
                (damage > 0).then_some((enemy.id, damage))
            })
            .collect();
        for (enemy, damage) in splashed {
            self.damage_enemy(enemy, damage, DestroyCause::Blast, out_events);
        }
        let boss_splash = self
            .boss
            .as_ref()
            .filter(|boss| !boss.marked)
            .and_then(|boss| blast_damage(boss.bounds.center().distance(position)))
            .filter(|damage| *damage > 0);
        if let Some(damage) = boss_splash {
            self.damage_boss(damage, false, out_events);
        }

        out_events.push(Event::MissileDetonated {
            missile,
            position,
            struck,
        });
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        position: Vec2,
        scale: DifficultyScale,
        pattern: Option<MovementPattern>,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.ids.enemy();
        let enemy = Enemy::new(id, kind, position, scale, pattern, &mut self.rng);
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            position,
            pattern: enemy.pattern(),
        });
        self.enemies.push(enemy);
    }

    fn damage_enemy(
        &mut self,
        id: EnemyId,
        damage: u32,
        cause: DestroyCause,
        out_events: &mut Vec<Event>,
    ) {
        let Some(enemy) = self.live_enemy_mut(id) else {
            return;
        };
        match enemy.hit(damage) {
            HitOutcome::Killed => {
                let kind = enemy.kind;
                let center = enemy.bounds.center();
                let size = enemy.bounds.size.x;
                let score = enemy.score;
                let shake_profile = kind.stats().shake;
                out_events.push(Event::Explosion {
                    position: center,
                    size,
                });
                shake(out_events, shake_profile.intensity, shake_profile.duration);
                self.award(score, out_events);
                out_events.push(Event::EnemyDestroyed {
                    enemy: id,
                    kind,
                    center,
                    cause,
                });
            }
            _ => {
                let remaining = enemy.hull.health();
                out_events.push(Event::EnemyDamaged {
                    enemy: id,
                    damage,
                    remaining,
                });
            }
        }
    }

    /// Hits the live boss; `drain` bypasses the shield.
    fn damage_boss(&mut self, damage: u32, drain: bool, out_events: &mut Vec<Event>) {
        let mut reactions = Vec::new();
        let Some(boss) = self.live_boss_mut() else {
            return;
        };
        let outcome = if drain {
            boss.drain(damage, &mut reactions)
        } else {
            boss.hit(damage, &mut reactions)
        };
        let boss_id = boss.id;
        let center = boss.bounds.center();
        let blast = boss.bounds.size.x * 0.8;
        out_events.push(Event::BossDamaged {
            boss: boss_id,
            damage,
            outcome,
        });

        for reaction in reactions {
            match reaction {
                BossReaction::ShieldBroken => {
                    debug!(boss = boss_id.get(), "boss shield broken");
                    out_events.push(Event::ShieldBroken { boss: boss_id });
                    out_events.push(Event::Explosion {
                        position: center,
                        size: blast,
                    });
                    shake(out_events, 5.0, 15);
                    notify(out_events, "BOSS SHIELD DOWN!", CYAN, 90);
                }
                BossReaction::Milestone(milestone) => {
                    debug!(boss = boss_id.get(), ?milestone, "boss milestone reached");
                    out_events.push(Event::BossMilestoneReached {
                        boss: boss_id,
                        milestone,
                    });
                    let text = match milestone {
                        BossMilestone::Damaged => "BOSS HEALTH 70%",
                        BossMilestone::Enraged => "BOSS ENRAGED!",
                        BossMilestone::Critical => "BOSS CRITICAL!",
                    };
                    notify(out_events, text, AMBER, 90);
                }
            }
        }

        if outcome == HitOutcome::Killed {
            self.defeat_boss(out_events);
        }
    }

    fn defeat_boss(&mut self, out_events: &mut Vec<Event>) {
        let Some((id, level, center, width, score)) = self
            .boss
            .as_ref()
            .map(|boss| (boss.id, boss.level, boss.bounds.center(), boss.bounds.size.x, boss.score))
        else {
            return;
        };
        info!(level, tick = self.tick, "boss defeated");

        self.award(score, out_events);
        out_events.push(Event::Explosion {
            position: center,
            size: width,
        });
        shake(out_events, 15.0, 60);
        for drop in 1..=SPOILS_DROPS {
            let offset = Vec2::new(
                self.rng.gen_range(-50.0..50.0),
                self.rng.gen_range(-25.0..25.0),
            );
            self.schedule.push(
                self.tick.saturating_add(SPOILS_INTERVAL * drop),
                ScheduledAction::Spoils {
                    position: center + offset,
                },
            );
        }
        notify(out_events, "BOSS DEFEATED!", GOLD, 180);
        out_events.push(Event::BossDefeated {
            boss: id,
            level,
            center,
        });
    }

    fn wound_player(&mut self, out_events: &mut Vec<Event>) {
        let Some(wound) = self.player.hit() else {
            return;
        };
        out_events.push(Event::HitEffect {
            position: self.player.center(),
            size: 40.0,
            color: ALERT,
        });
        shake(out_events, 3.0, 5);
        out_events.push(Event::PlayerHit {
            health: self.player.hull.health(),
            lives: self.player.lives,
        });
        if wound.life_lost {
            out_events.push(Event::LifeLost {
                lives: self.player.lives,
            });
        }
        if wound.game_over {
            info!(score = self.score, wave = self.wave, "game over");
            self.game_over = true;
            notify(out_events, "GAME OVER", RED, 300);
            out_events.push(Event::GameOver { score: self.score });
        }
    }

    fn reject(&self, action: PlayerAction, reason: RejectionReason, out_events: &mut Vec<Event>) {
        debug!(?action, ?reason, "player action rejected");
        out_events.push(Event::ActionRejected { action, reason });
    }

    fn fire_weapon(&mut self, out_events: &mut Vec<Event>) {
        let muzzle = Vec2::new(self.player.center().x, self.player.bounds.origin.y);
        let velocity_y = self.player.velocity.y;
        match self.player.arsenal.pull_trigger(muzzle, velocity_y) {
            Trigger::Cycling => {}
            Trigger::Empty { weapon } => {
                out_events.push(Event::AmmoDepleted { weapon });
                out_events.push(Event::WeaponChanged {
                    weapon: WeaponKind::Basic,
                });
            }
            Trigger::Fired {
                weapon,
                volley,
                notice,
            } => {
                let count = volley.len() as u32;
                for plan in volley {
                    self.projectiles.push(Projectile {
                        id: self.ids.projectile(),
                        bounds: plan.bounds,
                        velocity: plan.velocity,
                        damage: plan.damage,
                        marked: false,
                    });
                }
                out_events.push(Event::WeaponFired {
                    weapon,
                    projectiles: count,
                });
                match notice {
                    Some(AmmoNotice::Low { remaining }) => {
                        out_events.push(Event::AmmoLow { weapon, remaining });
                        notify(out_events, format!("{} AMMO LOW", weapon.label()), AMBER, 60);
                    }
                    Some(AmmoNotice::Depleted) => {
                        out_events.push(Event::AmmoDepleted { weapon });
                        notify(out_events, format!("{} DEPLETED", weapon.label()), ALERT, 60);
                        out_events.push(Event::WeaponChanged {
                            weapon: WeaponKind::Basic,
                        });
                    }
                    None => {}
                }
            }
        }
    }

    fn select_weapon(&mut self, weapon: WeaponKind, out_events: &mut Vec<Event>) {
        let action = PlayerAction::SelectWeapon(weapon);
        match self.player.arsenal.select(weapon) {
            Ok(()) => {
                out_events.push(Event::WeaponChanged { weapon });
                notify(
                    out_events,
                    format!("SWITCHED TO {}", weapon.label()),
                    weapon.profile().color,
                    60,
                );
            }
            Err(reason) => {
                self.reject(action, reason, out_events);
                if reason == RejectionReason::OutOfAmmo {
                    notify(out_events, format!("NO {} AMMO", weapon.label()), ALERT, 60);
                }
            }
        }
    }

    fn launch_missiles(&mut self, out_events: &mut Vec<Event>) {
        let action = PlayerAction::LaunchMissiles;
        if self.player.missiles == 0 {
            self.reject(action, RejectionReason::NoMissiles, out_events);
            notify(out_events, "NO MISSILES", ALERT, 60);
            return;
        }
        if self.player.missile_cooldown > 0 {
            self.reject(action, RejectionReason::CoolingDown, out_events);
            return;
        }

        let origin = self.player.center();
        let mut targets: Vec<TargetRef> = self
            .boss
            .as_ref()
            .filter(|boss| !boss.marked)
            .map(|boss| TargetRef::Boss(boss.id))
            .into_iter()
            .collect();
        let mut nearby: Vec<(EnemyId, f32)> = self
            .enemies
            .iter()
            .filter(|enemy| !enemy.marked)
            .map(|enemy| (enemy.id, enemy.bounds.center().distance(origin)))
            .collect();
        nearby.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        targets.extend(nearby.into_iter().map(|(id, _)| TargetRef::Enemy(id)));

        let count = self.player.missiles.min(MISSILES_PER_SALVO);
        let spread = (count as f32 - 1.0) * 0.5;
        for index in 0..count {
            let target = if targets.is_empty() {
                None
            } else {
                Some(targets[index as usize % targets.len()])
            };
            let launch = Vec2::new(
                origin.x + (index as f32 - spread) * 15.0,
                self.player.bounds.origin.y,
            );
            let id = self.ids.missile();
            self.missiles.push(Missile::new(id, launch, target));
        }

        self.player.missiles -= count;
        self.player.missile_cooldown = MISSILE_COOLDOWN;
        out_events.push(Event::MissilesLaunched {
            count,
            remaining: self.player.missiles,
        });
        notify(out_events, format!("LAUNCHED {count} MISSILES"), ORANGE, 60);
        shake(out_events, 3.0, 10);
    }

    fn activate_nuke(&mut self, out_events: &mut Vec<Event>) {
        let action = PlayerAction::ActivateNuke;
        if self.player.nukes == 0 {
            self.reject(action, RejectionReason::NoNukes, out_events);
            notify(out_events, "NO NUCLEAR WEAPONS", ALERT, 60);
            return;
        }
        if self.player.nuke_cooldown > 0 {
            self.reject(action, RejectionReason::CoolingDown, out_events);
            return;
        }

        self.player.nukes -= 1;
        self.player.nuke_cooldown = NUKE_COOLDOWN;
        info!(tick = self.tick, "nuclear strike");
        out_events.push(Event::NuclearExplosion {
            position: self.playfield.center(),
        });

        if let Some(health) = self
            .boss
            .as_ref()
            .filter(|boss| !boss.marked)
            .map(|boss| boss.hull.health())
        {
            self.damage_boss(health.div_ceil(2), true, out_events);
            notify(out_events, "BOSS DAMAGED", GOLD, 90);
        }

        let mut destroyed = 0u32;
        for index in 0..self.enemies.len() {
            let enemy = &mut self.enemies[index];
            if enemy.marked {
                continue;
            }
            enemy.marked = true;
            let (id, kind, center, size) =
                (enemy.id, enemy.kind, enemy.bounds.center(), enemy.bounds.size.x);
            self.schedule.push(
                self.tick
                    .saturating_add(STAGGER_TICKS * u64::from(destroyed)),
                ScheduledAction::Explosion {
                    position: center,
                    size,
                },
            );
            destroyed += 1;
            out_events.push(Event::EnemyDestroyed {
                enemy: id,
                kind,
                center,
                cause: DestroyCause::Nuke,
            });
            self.award(NUKE_ENEMY_SCORE, out_events);
        }

        out_events.push(Event::NukeDetonated { destroyed });
        shake(out_events, 15.0, 30);
        notify(out_events, "NUCLEAR STRIKE", RED, 120);
    }

    fn clear_enemies(&mut self, staggered: bool, out_events: &mut Vec<Event>) {
        let mut cleared = 0u64;
        for enemy in self.enemies.iter_mut().filter(|enemy| !enemy.marked) {
            enemy.marked = true;
            let center = enemy.bounds.center();
            let size = enemy.bounds.size.x;
            if staggered {
                self.schedule.push(
                    self.tick.saturating_add(STAGGER_TICKS * cleared),
                    ScheduledAction::Explosion {
                        position: center,
                        size,
                    },
                );
            } else {
                out_events.push(Event::Explosion {
                    position: center,
                    size,
                });
            }
            cleared += 1;
            out_events.push(Event::EnemyDestroyed {
                enemy: enemy.id,
                kind: enemy.kind,
                center,
                cause: DestroyCause::WaveCleared,
            });
        }
        debug!(cleared, staggered, "enemies cleared");

        // A boss outliving its wave leaves without score or spoils.
        if let Some(boss) = self.boss.as_mut().filter(|boss| !boss.marked) {
            boss.marked = true;
            info!(level = boss.level, tick = self.tick, "boss withdrew at wave end");
            out_events.push(Event::Explosion {
                position: boss.bounds.center(),
                size: boss.bounds.size.x,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigurePlayfield { width, height } => {
            world.playfield = Playfield::new(width.max(1.0), height.max(1.0));
            out_events.push(Event::PlayfieldConfigured {
                width: world.playfield.width(),
                height: world.playfield.height(),
            });
        }
        Command::Tick { dt } => {
            if world.paused || world.game_over {
                return;
            }
            world.advance(dt, out_events);
        }
        Command::SetPaused { paused } => {
            if world.paused == paused || world.game_over {
                return;
            }
            world.paused = paused;
            info!(paused, tick = world.tick, "pause toggled");
            if paused {
                out_events.push(Event::Paused);
                notify(out_events, "GAME PAUSED", Color::WHITE, 90);
            } else {
                out_events.push(Event::Resumed);
                notify(out_events, "GAME RESUMED", Color::WHITE, 90);
            }
        }
        Command::ResetSession => {
            info!(score = world.score, wave = world.wave, "session reset");
            world.reset();
            out_events.push(Event::SessionReset);
        }
        Command::SteerPlayer { axis } => world.player.steer(axis),
        Command::FireWeapon => {
            if !world.game_over {
                world.fire_weapon(out_events);
            }
        }
        Command::SelectWeapon { weapon } => {
            if world.game_over {
                world.reject(
                    PlayerAction::SelectWeapon(weapon),
                    RejectionReason::GameOver,
                    out_events,
                );
                return;
            }
            world.select_weapon(weapon, out_events);
        }
        Command::LaunchMissiles => {
            if world.game_over {
                world.reject(
                    PlayerAction::LaunchMissiles,
                    RejectionReason::GameOver,
                    out_events,
                );
                return;
            }
            world.launch_missiles(out_events);
        }
        Command::ActivateNuke => {
            if world.game_over {
                world.reject(
                    PlayerAction::ActivateNuke,
                    RejectionReason::GameOver,
                    out_events,
                );
                return;
            }
            world.activate_nuke(out_events);
        }
        Command::StartWave { wave } => {
            for enemy in &mut world.enemies {
                enemy.marked = true;
            }
            world.wave = wave;
            let boss_wave = is_boss_wave(wave);
            info!(wave, boss_wave, "wave started");
            if boss_wave {
                notify(out_events, "BOSS WAVE!", RED, 180);
            } else {
                notify(out_events, format!("WAVE {wave}"), Color::WHITE, 180);
            }
            out_events.push(Event::WaveStarted { wave, boss_wave });
        }
        Command::EndWave { wave, boss_next } => {
            info!(wave, boss_next, "wave ended");
            if boss_next {
                notify(out_events, "BOSS INCOMING", RED, 120);
            } else {
                notify(out_events, "WAVE COMPLETE", GREEN, 120);
            }
            out_events.push(Event::WaveEnded { wave });
        }
        Command::SpawnEnemy {
            kind,
            position,
            scale,
            pattern,
        } => world.spawn_enemy(kind, position, scale, pattern, out_events),
        Command::SpawnBoss { level } => {
            if world.boss.as_ref().map_or(false, |boss| !boss.marked) {
                debug!(level, "boss already present; spawn ignored");
                return;
            }
            let id = world.ids.boss();
            let boss = Boss::new(id, level, &world.playfield);
            info!(level = boss.level, "boss spawned");
            out_events.push(Event::BossSpawned {
                boss: id,
                level: boss.level,
            });
            world.boss = Some(boss);
        }
        Command::ClearEnemies { staggered } => world.clear_enemies(staggered, out_events),
        Command::SpawnPowerUp { kind, position } => {
            let id = world.ids.power_up();
            world.power_ups.push(PowerUp::new(id, kind, position));
            out_events.push(Event::PowerUpSpawned {
                power_up: id,
                kind,
                position,
            });
        }
        Command::ResolveProjectileHit { projectile, target } => {
            resolve_projectile_hit(world, projectile, target, out_events);
        }
        Command::ResolveRam { target } => resolve_ram(world, target, out_events),
        Command::ResolveHostileHit { projectile } => {
            if world.player.is_invulnerable() {
                return;
            }
            let boss_shots = world
                .boss
                .iter_mut()
                .flat_map(|boss| boss.projectiles.iter_mut());
            let enemy_shots = world
                .enemies
                .iter_mut()
                .flat_map(|enemy| enemy.projectiles.iter_mut());
            let Some(shot) = enemy_shots
                .chain(boss_shots)
                .find(|shot| shot.id == projectile && !shot.marked)
            else {
                return;
            };
            shot.marked = true;
            world.wound_player(out_events);
        }
        Command::CollectPowerUp { power_up } => {
            let Some(pickup) = world
                .power_ups
                .iter_mut()
                .find(|pickup| pickup.id == power_up && !pickup.marked)
            else {
                return;
            };
            pickup.marked = true;
            let kind = pickup.kind;
            debug!(?kind, "power-up collected");
            out_events.push(Event::PowerUpCollected { power_up, kind });
            crate::power_up::apply_effect(kind, &mut world.player, out_events);
        }
    }
}

fn resolve_projectile_hit(
    world: &mut World,
    projectile: ProjectileId,
    target: TargetRef,
    out_events: &mut Vec<Event>,
) {
    let target_alive = match target {
        TargetRef::Enemy(id) => world.enemies.iter().any(|enemy| enemy.id == id && !enemy.marked),
        TargetRef::Boss(id) => world
            .boss
            .as_ref()
            .map_or(false, |boss| boss.id == id && !boss.marked),
    };
    if !target_alive {
        return;
    }
    let Some(shot) = world
        .projectiles
        .iter_mut()
        .find(|shot| shot.id == projectile && !shot.marked)
    else {
        return;
    };
    shot.marked = true;
    let damage = shot.damage;
    let impact = shot.bounds.center();

    match target {
        TargetRef::Enemy(id) => {
            out_events.push(Event::HitEffect {
                position: impact,
                size: 15.0,
                color: Color::from_rgb(0xff, 0x66, 0x66),
            });
            world.damage_enemy(id, damage, DestroyCause::Projectile, out_events);
        }
        TargetRef::Boss(_) => {
            out_events.push(Event::HitEffect {
                position: impact,
                size: 20.0,
                color: ALERT,
            });
            world.damage_boss(damage, false, out_events);
        }
    }
}

fn resolve_ram(world: &mut World, target: TargetRef, out_events: &mut Vec<Event>) {
    if world.player.is_invulnerable() {
        return;
    }
    let speed = world.player.velocity.length();
    let contact = world.player.center();

    match target {
        TargetRef::Enemy(id) => {
            if world.live_enemy_mut(id).is_none() {
                return;
            }
            out_events.push(Event::HitEffect {
                position: contact,
                size: 25.0,
                color: Color::from_rgb(0xff, 0x55, 0x00),
            });
            shake(out_events, 10.0, 15);
            world.damage_enemy(id, enemy_ram_damage(speed), DestroyCause::Ram, out_events);
        }
        TargetRef::Boss(id) => {
            if world.live_boss_mut().map_or(true, |boss| boss.id != id) {
                return;
            }
            out_events.push(Event::HitEffect {
                position: contact,
                size: 30.0,
                color: ALERT,
            });
            shake(out_events, 10.0, 15);
            world.damage_boss(boss_ram_damage(speed), false, out_events);
        }
    }
    world.wound_player(out_events);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use starfall_core::{
        AttackPattern, BossPhase, BossSnapshot, CombatView, Playfield, PlayerSnapshot,
        SpecialAttackState, TimedEffect, WeaponKind,
    };

    use super::World;

    /// Player state beyond the collision snapshot: handling, stockpiles and timers.
    #[derive(Clone, Debug, PartialEq)]
    pub struct PlayerStatus {
        /// Collision-relevant snapshot of the craft.
        pub snapshot: PlayerSnapshot,
        /// Remaining ammunition per weapon; `None` marks the unlimited weapon.
        pub ammo: Vec<(WeaponKind, Option<u32>)>,
        /// Nuclear weapons in stock.
        pub nukes: u32,
        /// Missiles in stock.
        pub missiles: u32,
        /// Whether the godmode window is running.
        pub godmode: bool,
        /// Timed effects in force with their remaining ticks.
        pub effects: Vec<(TimedEffect, u32)>,
        /// Current top speed.
        pub max_speed: f32,
        /// Current acceleration per tick.
        pub acceleration: f32,
        /// Current bank angle used for presentation.
        pub roll: f32,
    }

    /// Boss state beyond the collision snapshot.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BossStatus {
        /// Collision-relevant snapshot of the boss.
        pub snapshot: BossSnapshot,
        /// Movement phase.
        pub phase: BossPhase,
        /// Attack pattern in use or queued.
        pub pattern: AttackPattern,
        /// Special attack progress.
        pub special: SpecialAttackState,
        /// Charge accumulated towards the special attack.
        pub charge: u32,
        /// Ticks between volleys.
        pub fire_interval: f32,
        /// Movement speed in effect.
        pub speed: f32,
    }

    /// Captures every live entity that takes part in collision checks.
    #[must_use]
    pub fn combat_view(world: &World) -> CombatView {
        let mut hostile_projectiles: Vec<_> = world
            .enemies
            .iter()
            .filter(|enemy| !enemy.marked)
            .flat_map(|enemy| enemy.projectiles.iter())
            .chain(
                world
                    .boss
                    .iter()
                    .filter(|boss| !boss.marked)
                    .flat_map(|boss| boss.projectiles.iter()),
            )
            .filter(|shot| !shot.marked)
            .map(|shot| shot.snapshot())
            .collect();
        hostile_projectiles.sort_by_key(|shot| shot.id);

        CombatView {
            player: world.player.snapshot(),
            enemies: world
                .enemies
                .iter()
                .filter(|enemy| !enemy.marked)
                .map(|enemy| enemy.snapshot())
                .collect(),
            boss: world
                .boss
                .as_ref()
                .filter(|boss| !boss.marked)
                .map(|boss| boss.snapshot()),
            projectiles: world
                .projectiles
                .iter()
                .filter(|shot| !shot.marked)
                .map(|shot| shot.snapshot())
                .collect(),
            hostile_projectiles,
            power_ups: world
                .power_ups
                .iter()
                .filter(|power_up| !power_up.marked)
                .map(|power_up| power_up.snapshot())
                .collect(),
        }
    }

    /// Reports the player's inventory, handling and timers.
    #[must_use]
    pub fn player_status(world: &World) -> PlayerStatus {
        let player = &world.player;
        let handling = player.handling();
        PlayerStatus {
            snapshot: player.snapshot(),
            ammo: WeaponKind::ALL
                .into_iter()
                .map(|weapon| (weapon, player.arsenal.ammo(weapon)))
                .collect(),
            nukes: player.nukes,
            missiles: player.missiles,
            godmode: player.godmode(),
            effects: [TimedEffect::Agility, TimedEffect::Thrust, TimedEffect::Godmode]
                .into_iter()
                .filter_map(|effect| Some((effect, player.effect_remaining(effect)?)))
                .collect(),
            max_speed: handling.max_speed,
            acceleration: handling.acceleration,
            roll: player.roll(),
        }
    }

    /// Reports the live boss, if any.
    #[must_use]
    pub fn boss_status(world: &World) -> Option<BossStatus> {
        let boss = world.boss.as_ref().filter(|boss| !boss.marked)?;
        Some(BossStatus {
            snapshot: boss.snapshot(),
            phase: boss.phase(),
            pattern: boss.pattern(),
            special: boss.special_state(),
            charge: boss.charge(),
            fire_interval: boss.fire_interval(),
            speed: boss.speed(),
        })
    }

    /// Number of regular enemies still in play.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.iter().filter(|enemy| !enemy.marked).count()
    }

    /// Whether a boss is alive.
    #[must_use]
    pub fn boss_alive(world: &World) -> bool {
        world.boss.as_ref().map_or(false, |boss| !boss.marked)
    }

    /// Playfield dimensions in effect.
    #[must_use]
    pub fn playfield(world: &World) -> Playfield {
        world.playfield
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Number of the current wave; zero before the first wave starts.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Number of ticks executed since the session began.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Whether the session is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Whether the player has run out of lives.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }
}
