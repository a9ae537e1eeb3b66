use glam::Vec2;
use starfall_core::{Aabb, Color, Event, Playfield, PowerUpId, PowerUpKind, PowerUpSnapshot};

use crate::{
    notify,
    player::{Player, MAX_MISSILES, MAX_NUKES},
};

const SIZE: Vec2 = Vec2::new(20.0, 20.0);
const FALL_SPEED: f32 = 3.5;
const HEAL_AMOUNT: u32 = 25;
const SPEED_BONUS: f32 = 1.0;
const MISSILE_PICKUP: u32 = 5;

#[derive(Clone, Debug)]
pub(crate) struct PowerUp {
    pub(crate) id: PowerUpId,
    pub(crate) kind: PowerUpKind,
    pub(crate) bounds: Aabb,
    pub(crate) marked: bool,
}

impl PowerUp {
    pub(crate) fn new(id: PowerUpId, kind: PowerUpKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            bounds: Aabb::new(position, SIZE),
            marked: false,
        }
    }

    pub(crate) fn advance(&mut self, playfield: &Playfield) {
        if self.marked {
            return;
        }
        self.bounds.origin.y += FALL_SPEED;
        self.bounds.origin.x += (self.bounds.origin.y * 0.02).sin() * 0.5;
        if self.bounds.origin.y > playfield.height() {
            self.marked = true;
        }
    }

    pub(crate) fn snapshot(&self) -> PowerUpSnapshot {
        PowerUpSnapshot {
            id: self.id,
            kind: self.kind,
            bounds: self.bounds,
        }
    }
}

fn ammo_pickup(kind: PowerUpKind) -> u32 {
    match kind {
        PowerUpKind::Double => 150,
        PowerUpKind::Triple => 200,
        PowerUpKind::Rapid => 250,
        PowerUpKind::Plasma => 100,
        _ => 0,
    }
}

/// Applies a collected power-up to the player and requests its feedback signals.
pub(crate) fn apply_effect(kind: PowerUpKind, player: &mut Player, out_events: &mut Vec<Event>) {
    let center = player.center();
    let (text, color) = match kind {
        PowerUpKind::Double | PowerUpKind::Triple | PowerUpKind::Rapid | PowerUpKind::Plasma => {
            let amount = ammo_pickup(kind);
            let Some(weapon) = kind.weapon() else {
                return;
            };
            player.arsenal.add_ammo(weapon, amount);
            let profile = weapon.profile();
            (format!("+{amount} {} AMMO", weapon.label()), profile.color)
        }
        PowerUpKind::Speed => {
            player.raise_top_speed(SPEED_BONUS);
            ("SPEED BOOST".to_owned(), Color::from_rgb(0xff, 0x55, 0x33))
        }
        PowerUpKind::Health => {
            player.heal(HEAL_AMOUNT);
            ("HEALTH RESTORED".to_owned(), Color::from_rgb(0xff, 0x33, 0x33))
        }
        PowerUpKind::Agility => {
            player.grant_agility();
            out_events.push(Event::HitEffect {
                position: center,
                size: 30.0,
                color: Color::from_rgb(0x66, 0xff, 0xcc),
            });
            ("AGILITY ENHANCED".to_owned(), Color::from_rgb(0x66, 0xff, 0xcc))
        }
        PowerUpKind::Thrust => {
            player.grant_thrust();
            out_events.push(Event::HitEffect {
                position: center,
                size: 30.0,
                color: Color::from_rgb(0xff, 0xcc, 0x33),
            });
            ("THRUST BOOSTED".to_owned(), Color::from_rgb(0xff, 0xcc, 0x33))
        }
        PowerUpKind::Godmode => {
            player.grant_godmode();
            out_events.push(Event::Explosion {
                position: center,
                size: 50.0,
            });
            out_events.push(Event::ScreenShake {
                intensity: 5.0,
                duration: 10,
            });
            ("GOD MODE ACTIVATED".to_owned(), Color::WHITE)
        }
        PowerUpKind::Nuclear => {
            if player.nukes < MAX_NUKES {
                player.nukes += 1;
                (
                    "NUCLEAR WEAPON ACQUIRED".to_owned(),
                    Color::from_rgb(0xff, 0x00, 0x00),
                )
            } else {
                (
                    "NUCLEAR ARSENAL FULL".to_owned(),
                    Color::from_rgb(0xff, 0x99, 0x00),
                )
            }
        }
        PowerUpKind::Missile => {
            let before = player.missiles;
            player.missiles = (player.missiles + MISSILE_PICKUP).min(MAX_MISSILES);
            let added = player.missiles - before;
            out_events.push(Event::HitEffect {
                position: center,
                size: 20.0,
                color: Color::from_rgb(0xff, 0x66, 0x00),
            });
            (format!("+{added} MISSILES"), Color::from_rgb(0xff, 0x66, 0x00))
        }
    };
    notify(out_events, text, color, 60);
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfall_core::WeaponKind;

    fn player() -> Player {
        Player::new(&Playfield::new(800.0, 600.0))
    }

    #[test]
    fn ammo_pickups_add_fixed_quantities() {
        let mut player = player();
        let mut events = Vec::new();
        apply_effect(PowerUpKind::Rapid, &mut player, &mut events);
        assert_eq!(player.arsenal.ammo(WeaponKind::Rapid), Some(350));
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Notification { text, .. } if text == "+250 RAPID AMMO"
        )));
    }

    #[test]
    fn health_is_capped() {
        let mut player = player();
        let mut events = Vec::new();
        let _ = player.hit();
        apply_effect(PowerUpKind::Health, &mut player, &mut events);
        assert_eq!(player.hull.health(), 100);
    }

    #[test]
    fn stockpiles_are_capped() {
        let mut player = player();
        let mut events = Vec::new();
        for _ in 0..5 {
            apply_effect(PowerUpKind::Nuclear, &mut player, &mut events);
            apply_effect(PowerUpKind::Missile, &mut player, &mut events);
        }
        assert_eq!(player.nukes, MAX_NUKES);
        assert_eq!(player.missiles, MAX_MISSILES);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Notification { text, .. } if text == "NUCLEAR ARSENAL FULL"
        )));
    }

    #[test]
    fn power_up_falls_and_leaves_the_field() {
        let playfield = Playfield::new(800.0, 10.0);
        let mut power_up = PowerUp::new(PowerUpId::new(0), PowerUpKind::Speed, Vec2::ZERO);
        for _ in 0..3 {
            power_up.advance(&playfield);
        }
        assert!(!power_up.marked);
        power_up.advance(&playfield);
        assert!(power_up.marked);
    }
}
