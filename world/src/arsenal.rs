//! Weapon inventory and firing rules for the player craft.

use std::collections::BTreeMap;

use glam::Vec2;
use starfall_core::{Aabb, RejectionReason, WeaponKind};

const STARTING_AMMO: u32 = 100;
const LOW_AMMO_MARK: u32 = 50;

/// Warning raised by a shot that changed the ammunition outlook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AmmoNotice {
    Low { remaining: u32 },
    Depleted,
}

/// Outcome of a trigger pull.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Trigger {
    /// The weapon is still cycling.
    Cycling,
    /// The equipped weapon had no ammunition; the basic weapon is equipped instead.
    Empty { weapon: WeaponKind },
    /// Projectiles left the muzzle.
    Fired {
        weapon: WeaponKind,
        volley: Vec<ProjectilePlan>,
        notice: Option<AmmoNotice>,
    },
}

/// Projectile requested by a shot before the world assigns an identifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ProjectilePlan {
    pub(crate) bounds: Aabb,
    pub(crate) velocity: Vec2,
    pub(crate) damage: u32,
}

/// Per-weapon ammunition plus the equipped weapon and its fire timer.
#[derive(Clone, Debug)]
pub(crate) struct Arsenal {
    equipped: WeaponKind,
    ammo: BTreeMap<WeaponKind, u32>,
    fire_timer: f32,
}

impl Default for Arsenal {
    fn default() -> Self {
        let ammo = WeaponKind::ALL
            .into_iter()
            .filter(|weapon| !weapon.is_unlimited())
            .map(|weapon| (weapon, STARTING_AMMO))
            .collect();
        Self {
            equipped: WeaponKind::Basic,
            ammo,
            fire_timer: 0.0,
        }
    }
}

impl Arsenal {
    pub(crate) fn equipped(&self) -> WeaponKind {
        self.equipped
    }

    /// Remaining rounds; `None` for the unlimited basic weapon.
    pub(crate) fn ammo(&self, weapon: WeaponKind) -> Option<u32> {
        if weapon.is_unlimited() {
            return None;
        }
        Some(self.ammo.get(&weapon).copied().unwrap_or(0))
    }

    pub(crate) fn add_ammo(&mut self, weapon: WeaponKind, amount: u32) {
        if weapon.is_unlimited() {
            return;
        }
        let count = self.ammo.entry(weapon).or_insert(0);
        *count = count.saturating_add(amount);
    }

    /// Advances the fire timer by one tick.
    pub(crate) fn cool_down(&mut self) {
        self.fire_timer += 1.0;
    }

    pub(crate) fn select(&mut self, weapon: WeaponKind) -> Result<(), RejectionReason> {
        if weapon == self.equipped {
            return Err(RejectionReason::AlreadyEquipped);
        }
        if self.ammo(weapon) == Some(0) {
            return Err(RejectionReason::OutOfAmmo);
        }
        self.equipped = weapon;
        Ok(())
    }

    /// Fires the equipped weapon from the top-centre of the craft.
    pub(crate) fn pull_trigger(&mut self, muzzle: Vec2, craft_velocity_y: f32) -> Trigger {
        let weapon = self.equipped;
        if self.ammo(weapon) == Some(0) {
            self.equipped = WeaponKind::Basic;
            return Trigger::Empty { weapon };
        }

        let profile = weapon.profile();
        if self.fire_timer < profile.fire_interval {
            return Trigger::Cycling;
        }
        self.fire_timer = 0.0;

        let speed_y = -(profile.projectile_speed + (craft_velocity_y * 0.5).abs());
        let size = profile.projectile_size;
        let plan = |offset: Vec2, velocity: Vec2| ProjectilePlan {
            bounds: Aabb::new(muzzle + offset - Vec2::new(size.x * 0.5, 0.0), size),
            velocity,
            damage: profile.damage,
        };

        let volley = match weapon {
            WeaponKind::Basic => vec![plan(Vec2::ZERO, Vec2::new(0.0, speed_y))],
            WeaponKind::Double => vec![
                plan(Vec2::new(-12.0, 12.0), Vec2::new(0.0, speed_y)),
                plan(Vec2::new(12.0, 12.0), Vec2::new(0.0, speed_y)),
            ],
            WeaponKind::Triple => vec![
                plan(Vec2::ZERO, Vec2::new(0.0, speed_y)),
                plan(Vec2::new(-8.0, 10.0), Vec2::new(-2.0, speed_y * 0.9)),
                plan(Vec2::new(8.0, 10.0), Vec2::new(2.0, speed_y * 0.9)),
            ],
            WeaponKind::Rapid => vec![plan(Vec2::ZERO, Vec2::new(0.0, speed_y * 1.2))],
            WeaponKind::Plasma => vec![plan(Vec2::new(0.0, 5.0), Vec2::new(0.0, speed_y * 0.8))],
        };

        let notice = self.consume_round(weapon);
        Trigger::Fired {
            weapon,
            volley,
            notice,
        }
    }

    fn consume_round(&mut self, weapon: WeaponKind) -> Option<AmmoNotice> {
        let count = self.ammo.get_mut(&weapon)?;
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.equipped = WeaponKind::Basic;
            return Some(AmmoNotice::Depleted);
        }
        (*count == LOW_AMMO_MARK).then_some(AmmoNotice::Low {
            remaining: LOW_AMMO_MARK,
        })
    }
}
