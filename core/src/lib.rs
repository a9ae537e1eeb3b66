#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Starfall combat simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, inspect
//! immutable snapshots, and respond exclusively with new command batches.
//!
//! Stat tables for every entity family live here as closed enums so that the
//! world and the systems agree on sizes, speeds and damage without sharing
//! mutable state.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of simulation ticks executed per simulated second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Simulated duration covered by a single fixed tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICKS_PER_SECOND as u64);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resizes the playfield used for bounds checks and spawn placement.
    ConfigurePlayfield {
        /// Horizontal extent of the playfield in world units.
        width: f32,
        /// Vertical extent of the playfield in world units.
        height: f32,
    },
    /// Advances the simulation by exactly one fixed tick.
    Tick {
        /// Simulated time covered by the tick.
        dt: Duration,
    },
    /// Suspends or resumes the session.
    SetPaused {
        /// Whether the session should be paused after the command.
        paused: bool,
    },
    /// Restores the session to its initial state: score, wave and entities.
    ResetSession,
    /// Updates the steering intent used by the player's momentum model.
    SteerPlayer {
        /// Steering axes in `[-1, 1]`; negative x steers left, negative y steers up.
        axis: Vec2,
    },
    /// Requests a shot from the equipped weapon.
    FireWeapon,
    /// Requests that the player equip another weapon.
    SelectWeapon {
        /// Weapon the player wants to equip.
        weapon: WeaponKind,
    },
    /// Requests a homing missile salvo.
    LaunchMissiles,
    /// Requests activation of a nuclear strike.
    ActivateNuke,
    /// Announces that a new wave begins.
    StartWave {
        /// Number of the wave being started.
        wave: u32,
    },
    /// Announces that the current wave is over.
    EndWave {
        /// Number of the wave that ended.
        wave: u32,
        /// Whether the next wave is a boss wave.
        boss_next: bool,
    },
    /// Spawns a regular enemy at the provided position.
    SpawnEnemy {
        /// Enemy family to spawn.
        kind: EnemyKind,
        /// Top-left corner of the enemy bounding box.
        position: Vec2,
        /// Multipliers applied once to the base stats.
        scale: DifficultyScale,
        /// Fixed movement pattern; `None` rolls one at random.
        pattern: Option<MovementPattern>,
    },
    /// Spawns a boss of the provided level.
    SpawnBoss {
        /// Level of the boss, at least one.
        level: u32,
    },
    /// Destroys every regular enemy without awarding score.
    ClearEnemies {
        /// Whether destruction effects are spread over consecutive ticks.
        staggered: bool,
    },
    /// Drops a power-up at the provided position.
    SpawnPowerUp {
        /// Effect carried by the power-up.
        kind: PowerUpKind,
        /// Top-left corner of the power-up bounding box.
        position: Vec2,
    },
    /// Resolves a player projectile striking a target.
    ResolveProjectileHit {
        /// Projectile that struck.
        projectile: ProjectileId,
        /// Target that was struck.
        target: TargetRef,
    },
    /// Resolves the player's body ramming a target.
    ResolveRam {
        /// Target rammed by the player.
        target: TargetRef,
    },
    /// Resolves a hostile projectile striking the player.
    ResolveHostileHit {
        /// Projectile that struck the player.
        projectile: HostileProjectileId,
    },
    /// Applies a power-up touched by the player.
    CollectPowerUp {
        /// Power-up collected by the player.
        power_up: PowerUpId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just executed, starting at one.
        tick: u64,
        /// Simulated time covered by the tick.
        dt: Duration,
    },
    /// Confirms the playfield dimensions in effect.
    PlayfieldConfigured {
        /// Horizontal extent of the playfield.
        width: f32,
        /// Vertical extent of the playfield.
        height: f32,
    },
    /// Announces that the session was paused.
    Paused,
    /// Announces that the session resumed.
    Resumed,
    /// Announces that the session was reset to its initial state.
    SessionReset,
    /// Announces that a wave began.
    WaveStarted {
        /// Number of the wave.
        wave: u32,
        /// Whether the wave is fought against a boss.
        boss_wave: bool,
    },
    /// Announces that a wave ended.
    WaveEnded {
        /// Number of the wave.
        wave: u32,
    },
    /// Confirms that an enemy entered the playfield.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Enemy family.
        kind: EnemyKind,
        /// Top-left corner of the enemy at spawn time.
        position: Vec2,
        /// Movement pattern fixed for the enemy's lifetime.
        pattern: MovementPattern,
    },
    /// Reports damage dealt to a surviving enemy.
    EnemyDamaged {
        /// Enemy that took damage.
        enemy: EnemyId,
        /// Damage applied.
        damage: u32,
        /// Health left after the hit.
        remaining: u32,
    },
    /// Reports that an enemy was destroyed.
    EnemyDestroyed {
        /// Enemy that was destroyed.
        enemy: EnemyId,
        /// Enemy family.
        kind: EnemyKind,
        /// Centre of the enemy when destroyed.
        center: Vec2,
        /// What destroyed the enemy.
        cause: DestroyCause,
    },
    /// Reports that an enemy left the bottom of the playfield.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
    },
    /// Confirms that a boss entered the playfield.
    BossSpawned {
        /// Identifier assigned to the boss.
        boss: BossId,
        /// Level of the boss.
        level: u32,
    },
    /// Reports the outcome of a hit against the boss.
    BossDamaged {
        /// Boss that was struck.
        boss: BossId,
        /// Damage carried by the hit.
        damage: u32,
        /// Whether the hit was absorbed, survived or lethal.
        outcome: HitOutcome,
    },
    /// Reports a boss movement phase transition.
    BossPhaseChanged {
        /// Boss that changed phase.
        boss: BossId,
        /// Phase entered.
        phase: BossPhase,
    },
    /// Reports that the boss shield collapsed.
    ShieldBroken {
        /// Boss whose shield collapsed.
        boss: BossId,
    },
    /// Reports that the boss shield came back online.
    ShieldRecharged {
        /// Boss whose shield recharged.
        boss: BossId,
    },
    /// Reports that the boss crossed a health milestone.
    BossMilestoneReached {
        /// Boss that crossed the milestone.
        boss: BossId,
        /// Milestone crossed.
        milestone: BossMilestone,
    },
    /// Reports that the boss began charging its special attack.
    SpecialAttackCharging {
        /// Boss that is charging.
        boss: BossId,
    },
    /// Reports that the boss released its special attack.
    SpecialAttackReleased {
        /// Boss that released the attack.
        boss: BossId,
        /// Flavour of attack that was released.
        kind: SpecialAttackKind,
    },
    /// Reports that the boss called reinforcements.
    MinionsSummoned {
        /// Boss that summoned.
        boss: BossId,
        /// Number of minions spawned.
        count: u32,
    },
    /// Reports that the boss was destroyed.
    BossDefeated {
        /// Boss that was destroyed.
        boss: BossId,
        /// Level of the destroyed boss.
        level: u32,
        /// Centre of the boss when destroyed.
        center: Vec2,
    },
    /// Requests a weighted power-up drop at the provided location.
    SpoilsDropped {
        /// Top-left corner for the dropped power-up.
        position: Vec2,
    },
    /// Reports that the player lost health.
    PlayerHit {
        /// Health left after the hit.
        health: u32,
        /// Lives left after the hit.
        lives: u32,
    },
    /// Reports that the player lost a life and had health restored.
    LifeLost {
        /// Lives left.
        lives: u32,
    },
    /// Reports the terminal game-over state.
    GameOver {
        /// Final score of the session.
        score: u64,
    },
    /// Reports that the player fired the equipped weapon.
    WeaponFired {
        /// Weapon that fired.
        weapon: WeaponKind,
        /// Number of projectiles created by the shot.
        projectiles: u32,
    },
    /// Reports that the player equipped another weapon.
    WeaponChanged {
        /// Weapon that is now equipped.
        weapon: WeaponKind,
    },
    /// Reports that a weapon's ammunition ran low.
    AmmoLow {
        /// Weapon that is running low.
        weapon: WeaponKind,
        /// Rounds left.
        remaining: u32,
    },
    /// Reports that a weapon ran out of ammunition.
    AmmoDepleted {
        /// Weapon that ran dry.
        weapon: WeaponKind,
    },
    /// Confirms that a power-up entered the playfield.
    PowerUpSpawned {
        /// Identifier assigned to the power-up.
        power_up: PowerUpId,
        /// Effect carried by the power-up.
        kind: PowerUpKind,
        /// Top-left corner at spawn time.
        position: Vec2,
    },
    /// Reports that the player collected a power-up.
    PowerUpCollected {
        /// Power-up that was collected.
        power_up: PowerUpId,
        /// Effect that was applied.
        kind: PowerUpKind,
    },
    /// Reports that a timed power-up effect wore off.
    EffectExpired {
        /// Effect that expired.
        effect: TimedEffect,
    },
    /// Reports a missile salvo leaving the player craft.
    MissilesLaunched {
        /// Missiles in the salvo.
        count: u32,
        /// Missiles left in the stockpile.
        remaining: u32,
    },
    /// Reports a missile explosion.
    MissileDetonated {
        /// Missile that exploded.
        missile: MissileId,
        /// Blast centre.
        position: Vec2,
        /// Target struck directly, if any.
        struck: Option<TargetRef>,
    },
    /// Reports a nuclear strike.
    NukeDetonated {
        /// Regular enemies destroyed by the strike.
        destroyed: u32,
    },
    /// Reports that a player action was refused.
    ActionRejected {
        /// Action that was refused.
        action: PlayerAction,
        /// Why the action was refused.
        reason: RejectionReason,
    },
    /// Requests a hit effect.
    HitEffect {
        /// Centre of the effect.
        position: Vec2,
        /// Size of the effect.
        size: f32,
        /// Tint of the effect.
        color: Color,
    },
    /// Requests an explosion effect.
    Explosion {
        /// Centre of the explosion.
        position: Vec2,
        /// Size of the explosion.
        size: f32,
    },
    /// Requests a nuclear explosion effect.
    NuclearExplosion {
        /// Centre of the explosion.
        position: Vec2,
    },
    /// Requests an on-screen notification.
    Notification {
        /// Text to display.
        text: String,
        /// Text colour.
        color: Color,
        /// Display time in ticks.
        duration: u32,
    },
    /// Requests a screen shake.
    ScreenShake {
        /// Maximum offset in world units.
        intensity: f32,
        /// Length of the shake in ticks.
        duration: u32,
    },
    /// Reports a score increase.
    ScoreAwarded {
        /// Points awarded.
        amount: u64,
        /// Score after the award.
        total: u64,
    },
}

/// RGB colour used by effect and notification requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Pure white.
    pub const WHITE: Self = Self::from_rgb(0xff, 0xff, 0xff);

    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Unique identifier assigned to a regular enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BossId(u32);

impl BossId {
    /// Creates a new boss identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a player projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile fired at the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostileProjectileId(u32);

impl HostileProjectileId {
    /// Creates a new hostile projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a homing missile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissileId(u32);

impl MissileId {
    /// Creates a new missile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerUpId(u32);

impl PowerUpId {
    /// Creates a new power-up identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier-based reference to something the player can damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetRef {
    /// A regular enemy or minion.
    Enemy(EnemyId),
    /// The boss.
    Boss(BossId),
}

/// Dimensions of the rectangular playfield, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    width: f32,
    height: f32,
}

impl Playfield {
    /// Creates a playfield with the provided extent.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of the playfield.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the playfield.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Centre point of the playfield.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Axis-aligned bounding box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Aabb {
    /// Creates a bounding box from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Reports whether two boxes overlap. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.origin.x < other.origin.x + other.size.x
            && self.origin.x + self.size.x > other.origin.x
            && self.origin.y < other.origin.y + other.size.y
            && self.origin.y + self.size.y > other.origin.y
    }
}

/// Screen-shake request parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShakeProfile {
    /// Maximum offset in world units.
    pub intensity: f32,
    /// Length of the shake in ticks.
    pub duration: u32,
}

impl ShakeProfile {
    /// Creates a new shake profile.
    #[must_use]
    pub const fn new(intensity: f32, duration: u32) -> Self {
        Self {
            intensity,
            duration,
        }
    }
}

/// Regular enemy families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast and fragile.
    Small,
    /// Balanced.
    Medium,
    /// Slow, tough, and armed.
    Large,
}

/// Unscaled stats of an enemy family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Bounding box size.
    pub size: Vec2,
    /// Downward speed in units per tick.
    pub speed: f32,
    /// Maximum health.
    pub health: u32,
    /// Score awarded when destroyed by the player.
    pub score: u32,
    /// Screen shake requested when the enemy is shot down.
    pub shake: ShakeProfile,
}

impl EnemyKind {
    /// Every enemy family from weakest to toughest.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Small, EnemyKind::Medium, EnemyKind::Large];

    /// Base stat table for the family.
    #[must_use]
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Small => EnemyStats {
                size: Vec2::new(24.0, 24.0),
                speed: 4.5,
                health: 15,
                score: 10,
                shake: ShakeProfile::new(3.0, 5),
            },
            EnemyKind::Medium => EnemyStats {
                size: Vec2::new(32.0, 32.0),
                speed: 3.5,
                health: 35,
                score: 20,
                shake: ShakeProfile::new(5.0, 8),
            },
            EnemyKind::Large => EnemyStats {
                size: Vec2::new(48.0, 48.0),
                speed: 2.5,
                health: 70,
                score: 50,
                shake: ShakeProfile::new(8.0, 12),
            },
        }
    }
}

/// Movement patterns an enemy may follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Falls straight down.
    Straight,
    /// Falls while bouncing sideways, flipping direction on a fixed period.
    Zigzag,
    /// Falls while swaying along a sine wave keyed on its height.
    Sine,
    /// Falls while drifting toward the player's column.
    Chase,
}

impl MovementPattern {
    /// Maps a uniform roll in `[0, 1)` onto a pattern.
    #[must_use]
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.3 {
            MovementPattern::Straight
        } else if roll < 0.6 {
            MovementPattern::Zigzag
        } else if roll < 0.85 {
            MovementPattern::Sine
        } else {
            MovementPattern::Chase
        }
    }
}

/// Multipliers applied once to an enemy's base stats at creation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyScale {
    /// Health multiplier; scaled health is rounded up.
    pub health: f32,
    /// Speed multiplier.
    pub speed: f32,
    /// Score multiplier; scaled score is rounded up.
    pub score: f32,
}

impl DifficultyScale {
    /// Leaves base stats untouched.
    pub const UNIT: Self = Self {
        health: 1.0,
        speed: 1.0,
        score: 1.0,
    };

    /// Scaling used for enemies spawned during the provided wave.
    #[must_use]
    pub fn for_wave(wave: u32) -> Self {
        let wave = wave as f32;
        Self {
            health: 1.0 + wave * 0.08,
            speed: 1.0 + wave * 0.04,
            score: 1.0 + wave * 0.2,
        }
    }

    /// Scaling used for minions summoned by a boss of the provided level.
    #[must_use]
    pub fn for_minion(level: u32) -> Self {
        let level = level as f32;
        Self {
            health: 1.0 + level * 0.1,
            speed: 1.0 + level * 0.05,
            score: 1.0,
        }
    }

    /// Applies the health multiplier, rounding up.
    #[must_use]
    pub fn scale_health(&self, base: u32) -> u32 {
        (base as f32 * self.health).ceil() as u32
    }

    /// Applies the score multiplier, rounding up.
    #[must_use]
    pub fn scale_score(&self, base: u32) -> u32 {
        (base as f32 * self.score).ceil() as u32
    }

    /// Applies the speed multiplier.
    #[must_use]
    pub fn scale_speed(&self, base: f32) -> f32 {
        base * self.speed
    }
}

/// Weapons the player can equip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Default single shot with unlimited ammunition.
    Basic,
    /// Two parallel shots.
    Double,
    /// Centre shot plus two angled shots.
    Triple,
    /// Fast single shot.
    Rapid,
    /// Slow, heavy bolt.
    Plasma,
}

/// Firing characteristics of a weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponProfile {
    /// Ticks that must elapse between shots.
    pub fire_interval: f32,
    /// Upward projectile speed in units per tick.
    pub projectile_speed: f32,
    /// Damage dealt by each projectile.
    pub damage: u32,
    /// Projectile bounding box size.
    pub projectile_size: Vec2,
    /// Tint used for the weapon's projectiles and notifications.
    pub color: Color,
}

impl WeaponKind {
    /// Every weapon in selection-slot order.
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Basic,
        WeaponKind::Double,
        WeaponKind::Triple,
        WeaponKind::Rapid,
        WeaponKind::Plasma,
    ];

    /// Resolves a one-based selection slot.
    #[must_use]
    pub fn from_slot(slot: u8) -> Option<Self> {
        let index = usize::from(slot).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Reports whether the weapon never consumes ammunition.
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        matches!(self, WeaponKind::Basic)
    }

    /// Upper-case display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            WeaponKind::Basic => "BASIC",
            WeaponKind::Double => "DOUBLE",
            WeaponKind::Triple => "TRIPLE",
            WeaponKind::Rapid => "RAPID",
            WeaponKind::Plasma => "PLASMA",
        }
    }

    /// Firing characteristics of the weapon.
    #[must_use]
    pub fn profile(self) -> WeaponProfile {
        let standard = Vec2::new(4.0, 10.0);
        match self {
            WeaponKind::Basic => WeaponProfile {
                fire_interval: 1.2,
                projectile_speed: 10.0,
                damage: 10,
                projectile_size: standard,
                color: Color::from_rgb(0x33, 0xcc, 0xff),
            },
            WeaponKind::Double => WeaponProfile {
                fire_interval: 1.4,
                projectile_speed: 12.0,
                damage: 10,
                projectile_size: standard,
                color: Color::from_rgb(0x33, 0xcc, 0xff),
            },
            WeaponKind::Triple => WeaponProfile {
                fire_interval: 1.7,
                projectile_speed: 12.0,
                damage: 10,
                projectile_size: standard,
                color: Color::from_rgb(0x33, 0xff, 0x33),
            },
            WeaponKind::Rapid => WeaponProfile {
                fire_interval: 1.0,
                projectile_speed: 20.0,
                damage: 9,
                projectile_size: standard,
                color: Color::from_rgb(0xff, 0xff, 0x33),
            },
            WeaponKind::Plasma => WeaponProfile {
                fire_interval: 5.0,
                projectile_speed: 9.0,
                damage: 30,
                projectile_size: Vec2::new(12.0, 16.0),
                color: Color::from_rgb(0xff, 0x33, 0xff),
            },
        }
    }
}

/// Effects a power-up can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Ammunition for the double weapon.
    Double,
    /// Ammunition for the triple weapon.
    Triple,
    /// Ammunition for the rapid weapon.
    Rapid,
    /// Ammunition for the plasma weapon.
    Plasma,
    /// Permanent top-speed increase.
    Speed,
    /// Restores health.
    Health,
    /// Temporary steering and drag boost.
    Agility,
    /// Temporary acceleration and top-speed boost.
    Thrust,
    /// Temporary invulnerability.
    Godmode,
    /// One nuclear strike.
    Nuclear,
    /// Homing missiles.
    Missile,
}

impl PowerUpKind {
    /// Every power-up kind in drop-table order.
    pub const ALL: [PowerUpKind; 11] = [
        PowerUpKind::Double,
        PowerUpKind::Triple,
        PowerUpKind::Rapid,
        PowerUpKind::Plasma,
        PowerUpKind::Speed,
        PowerUpKind::Health,
        PowerUpKind::Agility,
        PowerUpKind::Thrust,
        PowerUpKind::Godmode,
        PowerUpKind::Nuclear,
        PowerUpKind::Missile,
    ];

    /// Relative weight used when enemies drop a power-up.
    #[must_use]
    pub const fn drop_weight(self) -> u32 {
        match self {
            PowerUpKind::Double => 20,
            PowerUpKind::Triple => 15,
            PowerUpKind::Rapid
            | PowerUpKind::Plasma
            | PowerUpKind::Speed
            | PowerUpKind::Health
            | PowerUpKind::Nuclear
            | PowerUpKind::Missile => 10,
            PowerUpKind::Agility | PowerUpKind::Thrust => 15,
            PowerUpKind::Godmode => 4,
        }
    }

    /// Weapon whose ammunition the power-up refills, if any.
    #[must_use]
    pub const fn weapon(self) -> Option<WeaponKind> {
        match self {
            PowerUpKind::Double => Some(WeaponKind::Double),
            PowerUpKind::Triple => Some(WeaponKind::Triple),
            PowerUpKind::Rapid => Some(WeaponKind::Rapid),
            PowerUpKind::Plasma => Some(WeaponKind::Plasma),
            _ => None,
        }
    }
}

/// Power-up effects that wear off after a fixed window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimedEffect {
    /// Steering responsiveness and drag boost.
    Agility,
    /// Acceleration and top-speed boost.
    Thrust,
    /// Invulnerability.
    Godmode,
}

/// Movement phases of the boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    /// Descending into the playfield.
    Entering,
    /// Running an attack pattern and firing.
    Attack,
    /// Idling between attack patterns.
    Cooldown,
}

/// Trajectories the boss follows while attacking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Horizontal sine sweep.
    Sweep,
    /// Coupled sine on both axes.
    FigureEight,
    /// Horizontal pursuit of the player with a vertical wobble.
    Chase,
}

impl AttackPattern {
    /// Patterns in rotation order.
    pub const ALL: [AttackPattern; 3] = [
        AttackPattern::Sweep,
        AttackPattern::FigureEight,
        AttackPattern::Chase,
    ];

    /// Resolves a pattern index modulo the number of patterns.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Index of the pattern within the rotation.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            AttackPattern::Sweep => 0,
            AttackPattern::FigureEight => 1,
            AttackPattern::Chase => 2,
        }
    }

    /// Pattern that follows this one after a cooldown.
    #[must_use]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Progress of the boss special attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAttackState {
    /// Waiting for the special attack timer and the health trigger.
    Idle,
    /// Accumulating charge.
    Charging,
    /// Releasing a charged attack; returns to idle on the same tick.
    Firing,
}

/// Payoffs of a fully charged special attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAttackKind {
    /// Ring of projectiles around the boss.
    RadialBurst,
    /// Staged blasts tracing a line toward the player.
    LaserBlast,
}

/// Health thresholds that trigger one-time boss reactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossMilestone {
    /// Crossed 70% health.
    Damaged,
    /// Crossed 50% health; speed and fire rate increase.
    Enraged,
    /// Crossed 25% health; speed and fire rate increase again.
    Critical,
}

impl BossMilestone {
    /// Milestones in the order they are crossed.
    pub const ALL: [BossMilestone; 3] = [
        BossMilestone::Damaged,
        BossMilestone::Enraged,
        BossMilestone::Critical,
    ];

    /// Fraction of maximum health below which the milestone fires.
    #[must_use]
    pub const fn threshold(self) -> f32 {
        match self {
            BossMilestone::Damaged => 0.7,
            BossMilestone::Enraged => 0.5,
            BossMilestone::Critical => 0.25,
        }
    }
}

/// Result of applying a hit to a damageable actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitOutcome {
    /// A shield absorbed the damage; health is untouched.
    Blocked,
    /// Health dropped but stayed above zero.
    Survived,
    /// Health reached zero.
    Killed,
}

/// Integer health pool. Health never drops below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hull {
    health: u32,
    max: u32,
}

impl Hull {
    /// Creates a hull at full health.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { health: max, max }
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reports whether health reached zero.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Current health as a fraction of maximum health.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.health as f32 / self.max as f32
    }

    /// Removes health; a blow larger than the remaining health destroys the hull.
    pub fn damage(&mut self, amount: u32) -> HitOutcome {
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            HitOutcome::Killed
        } else {
            HitOutcome::Survived
        }
    }

    /// Restores health up to the provided cap, never above maximum health.
    pub fn heal(&mut self, amount: u32, cap: u32) {
        let cap = cap.min(self.max);
        self.health = self.health.saturating_add(amount).min(cap).max(self.health);
    }

    /// Restores full health.
    pub fn refill(&mut self) {
        self.health = self.max;
    }
}

/// Secondary health pool that absorbs hits before the hull.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shield {
    health: u32,
    max: u32,
    broken: bool,
    broken_for: u32,
}

impl Shield {
    /// Creates a fully charged shield.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self {
            health: max,
            max,
            broken: false,
            broken_for: 0,
        }
    }

    /// Remaining shield health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Maximum shield health.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reports whether the shield collapsed and awaits recharge.
    #[must_use]
    pub const fn is_broken(&self) -> bool {
        self.broken
    }

    /// Reports whether the shield currently absorbs hits.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        !self.broken && self.health > 0
    }

    /// Absorbs a hit entirely. Returns `true` when the hit collapsed the shield.
    pub fn absorb(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 && !self.broken {
            self.broken = true;
            self.broken_for = 0;
            return true;
        }
        false
    }

    /// Advances the recharge timer of a broken shield by one tick.
    ///
    /// Once `delay` ticks have elapsed the shield comes back online at the
    /// provided fraction of its maximum and `true` is returned.
    pub fn advance_recharge(&mut self, delay: u32, fraction: f32) -> bool {
        if !self.broken {
            return false;
        }
        self.broken_for = self.broken_for.saturating_add(1);
        if self.broken_for < delay {
            return false;
        }
        self.broken = false;
        self.broken_for = 0;
        self.health = ((self.max as f32 * fraction) as u32).max(1);
        true
    }
}

/// Applies a hit to a hull guarded by an optional shield.
///
/// An active shield absorbs the full blow even when the blow exceeds the
/// remaining shield health; the hull is only exposed once the shield is down.
pub fn strike(hull: &mut Hull, shield: Option<&mut Shield>, damage: u32) -> HitOutcome {
    if let Some(shield) = shield {
        if shield.is_up() {
            let _ = shield.absorb(damage);
            return HitOutcome::Blocked;
        }
    }
    hull.damage(damage)
}

/// Damage a regular enemy takes when rammed by a craft moving at `speed`.
#[must_use]
pub fn enemy_ram_damage(speed: f32) -> u32 {
    (20.0 + 5.0 * speed).floor() as u32
}

/// Damage a boss takes when rammed by a craft moving at `speed`.
#[must_use]
pub fn boss_ram_damage(speed: f32) -> u32 {
    (10.0 + 2.0 * speed).floor() as u32
}

/// Every tenth wave is fought against a boss.
#[must_use]
pub const fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % 10 == 0
}

/// Level of the boss met on a boss wave.
#[must_use]
pub const fn boss_level(wave: u32) -> u32 {
    let level = wave / 10;
    if level == 0 {
        1
    } else {
        level
    }
}

/// Causes of regular enemy destruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestroyCause {
    /// Shot down by a player projectile.
    Projectile,
    /// Rammed by the player craft.
    Ram,
    /// Struck directly by a homing missile.
    Missile,
    /// Caught in a missile blast.
    Blast,
    /// Vaporized by a nuclear strike.
    Nuke,
    /// Removed when the wave ended.
    WaveCleared,
}

/// Player actions that can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Equipping a weapon.
    SelectWeapon(WeaponKind),
    /// Launching a missile salvo.
    LaunchMissiles,
    /// Triggering a nuclear strike.
    ActivateNuke,
}

/// Reasons a player action was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The requested weapon has no ammunition.
    OutOfAmmo,
    /// The missile stockpile is empty.
    NoMissiles,
    /// The nuclear stockpile is empty.
    NoNukes,
    /// The action is still cooling down.
    CoolingDown,
    /// The requested weapon is already equipped.
    AlreadyEquipped,
    /// The game is over.
    GameOver,
}

/// Frozen snapshot of logical input intents for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntents {
    /// Steering axes in `[-1, 1]`; negative x steers left, negative y steers up.
    pub steer: Vec2,
    /// Whether the fire control is held.
    pub fire: bool,
    /// Whether the missile control is held.
    pub launch_missiles: bool,
    /// Whether the nuke control is held.
    pub activate_nuke: bool,
    /// Weapon slot (1..=5) held this frame, if any.
    pub weapon_slot: Option<u8>,
    /// Whether the pause control is held.
    pub toggle_pause: bool,
}

/// Read-only description of the player craft.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Bounding box of the craft.
    pub bounds: Aabb,
    /// Current velocity in units per tick.
    pub velocity: Vec2,
    /// Whether hits are currently ignored.
    pub invulnerable: bool,
    /// Current health.
    pub health: u32,
    /// Lives left.
    pub lives: u32,
    /// Equipped weapon.
    pub weapon: WeaponKind,
}

/// Read-only description of a regular enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Enemy family.
    pub kind: EnemyKind,
    /// Bounding box.
    pub bounds: Aabb,
    /// Health pool.
    pub hull: Hull,
}

/// Read-only description of the boss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossSnapshot {
    /// Identifier of the boss.
    pub id: BossId,
    /// Level of the boss.
    pub level: u32,
    /// Bounding box.
    pub bounds: Aabb,
    /// Health pool.
    pub hull: Hull,
    /// Shield, for levels that carry one.
    pub shield: Option<Shield>,
    /// Movement phase.
    pub phase: BossPhase,
}

/// Read-only description of a player projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Bounding box.
    pub bounds: Aabb,
    /// Damage dealt on impact.
    pub damage: u32,
}

/// Read-only description of a projectile fired at the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostileProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: HostileProjectileId,
    /// Centre of the projectile.
    pub position: Vec2,
    /// Diameter of the projectile.
    pub size: f32,
}

/// Read-only description of a power-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpSnapshot {
    /// Identifier of the power-up.
    pub id: PowerUpId,
    /// Effect carried by the power-up.
    pub kind: PowerUpKind,
    /// Bounding box.
    pub bounds: Aabb,
}

/// Everything collision resolution needs to know about one tick.
///
/// Collections only contain live entities and are sorted by identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatView {
    /// The player craft.
    pub player: PlayerSnapshot,
    /// Live regular enemies.
    pub enemies: Vec<EnemySnapshot>,
    /// The boss, when one is alive.
    pub boss: Option<BossSnapshot>,
    /// Live player projectiles.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Live hostile projectiles from every owner.
    pub hostile_projectiles: Vec<HostileProjectileSnapshot>,
    /// Power-ups on the field.
    pub power_ups: Vec<PowerUpSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_damage_saturates_at_zero() {
        let mut hull = Hull::new(15);
        assert_eq!(hull.damage(20), HitOutcome::Killed);
        assert_eq!(hull.health(), 0);
        assert!(hull.is_destroyed());
    }

    #[test]
    fn hull_damage_is_monotonic() {
        let mut hull = Hull::new(100);
        let mut previous = hull.health();
        for amount in [0, 1, 7, 30, 90] {
            let _ = hull.damage(amount);
            assert!(hull.health() <= previous);
            previous = hull.health();
        }
    }

    #[test]
    fn heal_respects_cap() {
        let mut hull = Hull::new(100);
        let _ = hull.damage(40);
        hull.heal(25, 100);
        assert_eq!(hull.health(), 85);
        hull.heal(25, 100);
        assert_eq!(hull.health(), 100);
    }

    #[test]
    fn shield_absorbs_until_broken() {
        let mut hull = Hull::new(1_320);
        let mut shield = Shield::new(500);

        assert_eq!(strike(&mut hull, Some(&mut shield), 600), HitOutcome::Blocked);
        assert!(shield.is_broken());
        assert_eq!(shield.health(), 0);
        assert_eq!(hull.health(), 1_320);

        assert_eq!(strike(&mut hull, Some(&mut shield), 50), HitOutcome::Survived);
        assert_eq!(hull.health(), 1_270);
    }

    #[test]
    fn partial_shield_hit_reduces_by_exact_amount() {
        let mut hull = Hull::new(100);
        let mut shield = Shield::new(500);
        assert_eq!(strike(&mut hull, Some(&mut shield), 120), HitOutcome::Blocked);
        assert_eq!(shield.health(), 380);
        assert!(!shield.is_broken());
    }

    #[test]
    fn shield_recharges_to_fraction_after_delay() {
        let mut shield = Shield::new(500);
        assert!(shield.absorb(500));
        for _ in 0..299 {
            assert!(!shield.advance_recharge(300, 0.3));
        }
        assert!(shield.advance_recharge(300, 0.3));
        assert_eq!(shield.health(), 150);
        assert!(shield.is_up());
    }

    #[test]
    fn wave_scaling_rounds_up() {
        let scale = DifficultyScale::for_wave(1);
        assert_eq!(scale.scale_health(15), 17);
        assert_eq!(scale.scale_score(10), 12);
        assert_eq!(DifficultyScale::UNIT.scale_health(15), 15);
    }

    #[test]
    fn weapon_slots_map_in_order() {
        assert_eq!(WeaponKind::from_slot(1), Some(WeaponKind::Basic));
        assert_eq!(WeaponKind::from_slot(5), Some(WeaponKind::Plasma));
        assert_eq!(WeaponKind::from_slot(0), None);
        assert_eq!(WeaponKind::from_slot(6), None);
    }

    #[test]
    fn ram_damage_grows_with_speed() {
        assert_eq!(enemy_ram_damage(0.0), 20);
        assert_eq!(enemy_ram_damage(8.0), 60);
        assert_eq!(boss_ram_damage(3.7), 17);
    }

    #[test]
    fn boss_waves_every_tenth_wave() {
        assert!(!is_boss_wave(9));
        assert!(is_boss_wave(10));
        assert!(is_boss_wave(30));
        assert_eq!(boss_level(10), 1);
        assert_eq!(boss_level(40), 4);
    }

    #[test]
    fn attack_patterns_cycle() {
        assert_eq!(AttackPattern::Sweep.next(), AttackPattern::FigureEight);
        assert_eq!(AttackPattern::Chase.next(), AttackPattern::Sweep);
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let c = Aabb::new(Vec2::new(9.5, 9.5), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn input_intents_survive_bincode() {
        let intents = InputIntents {
            steer: Vec2::new(-1.0, 0.5),
            fire: true,
            weapon_slot: Some(3),
            ..InputIntents::default()
        };
        let bytes = bincode::serialize(&intents).expect("serialize intents");
        let decoded: InputIntents = bincode::deserialize(&bytes).expect("deserialize intents");
        assert_eq!(decoded, intents);
    }
}
