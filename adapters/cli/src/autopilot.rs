use glam::Vec2;
use starfall_core::{InputIntents, WeaponKind};
use starfall_world::{query, World};

const AIM_DEADZONE: f32 = 8.0;
const DODGE_RADIUS: f32 = 90.0;
const MISSILE_PRESS_INTERVAL: u64 = 30;
const NUKE_CROWD: usize = 20;

/// Scripted pilot used to exercise the simulation without a human player.
///
/// Lines up under the boss or the nearest enemy, sidesteps hostile fire,
/// keeps the best stocked weapon equipped and spends missiles and nukes when
/// the field gets crowded.
pub(crate) fn intents(world: &World) -> InputIntents {
    let view = query::combat_view(world);
    let status = query::player_status(world);
    let tick = query::tick(world);
    let center = view.player.bounds.center();

    let target = view
        .boss
        .map(|boss| boss.bounds.center())
        .or_else(|| {
            view.enemies
                .iter()
                .map(|enemy| enemy.bounds.center())
                .min_by(|a, b| a.distance(center).total_cmp(&b.distance(center)))
        });

    let mut steer = Vec2::ZERO;
    if let Some(target) = target {
        let dx = target.x - center.x;
        if dx.abs() > AIM_DEADZONE {
            steer.x = dx.signum();
        }
    }
    if let Some(shot) = view
        .hostile_projectiles
        .iter()
        .filter(|shot| shot.position.distance(center) < DODGE_RADIUS)
        .min_by(|a, b| {
            a.position
                .distance(center)
                .total_cmp(&b.position.distance(center))
        })
    {
        steer.x = if shot.position.x > center.x { -1.0 } else { 1.0 };
    }

    let weapon_slot = status
        .ammo
        .iter()
        .rev()
        .find(|(_, ammo)| ammo.map_or(true, |rounds| rounds > 0))
        .and_then(|(weapon, _)| slot_of(*weapon));

    let crowded = view.enemies.len() >= NUKE_CROWD;
    let press = tick % MISSILE_PRESS_INTERVAL == 0;
    InputIntents {
        steer,
        fire: true,
        launch_missiles: press
            && status.missiles > 0
            && (view.boss.is_some() || !view.enemies.is_empty()),
        activate_nuke: press && status.nukes > 0 && (crowded || view.boss.is_some()),
        weapon_slot,
        toggle_pause: false,
    }
}

fn slot_of(weapon: WeaponKind) -> Option<u8> {
    let index = WeaponKind::ALL.iter().position(|kind| *kind == weapon)?;
    u8::try_from(index + 1).ok()
}
