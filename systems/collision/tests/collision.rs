use glam::Vec2;
use starfall_core::{
    Command, DestroyCause, DifficultyScale, EnemyKind, Event, MovementPattern, TICK_DURATION,
};
use starfall_system_collision::Collision;
use starfall_world::{self as world, query, World};

fn apply_all(world: &mut World, commands: Vec<Command>, log: &mut Vec<Event>) {
    for command in commands {
        world::apply(world, command, log);
    }
}

fn resolve(world: &mut World, collision: &mut Collision, log: &mut Vec<Event>) {
    let mut commands = Vec::new();
    collision.handle(&query::combat_view(world), &mut commands);
    apply_all(world, commands, log);
}

fn spawn(world: &mut World, kind: EnemyKind, position: Vec2) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            kind,
            position,
            scale: DifficultyScale::UNIT,
            pattern: Some(MovementPattern::Straight),
        },
        &mut events,
    );
}

#[test]
fn projectiles_fired_upwards_destroy_descending_enemies() {
    let mut world = World::new();
    let mut collision = Collision::new();
    let player = query::combat_view(&world).player.bounds;
    spawn(
        &mut world,
        EnemyKind::Small,
        Vec2::new(player.center().x - 12.0, 100.0),
    );

    let mut log = Vec::new();
    for _ in 0..120 {
        world::apply(&mut world, Command::FireWeapon, &mut log);
        world::apply(&mut world, Command::Tick { dt: TICK_DURATION }, &mut log);
        resolve(&mut world, &mut collision, &mut log);
        if query::live_enemy_count(&world) == 0 {
            break;
        }
    }

    assert!(log.iter().any(|event| matches!(
        event,
        Event::EnemyDestroyed {
            cause: DestroyCause::Projectile,
            ..
        }
    )));
    assert_eq!(query::score(&world), 10);
}

#[test]
fn ramming_an_enemy_costs_the_player_health_once() {
    let mut world = World::new();
    let mut collision = Collision::new();
    let player = query::combat_view(&world).player.bounds;
    spawn(&mut world, EnemyKind::Large, player.origin);
    spawn(&mut world, EnemyKind::Large, player.origin + Vec2::new(4.0, 0.0));

    let mut log = Vec::new();
    resolve(&mut world, &mut collision, &mut log);
    resolve(&mut world, &mut collision, &mut log);

    let hits = log
        .iter()
        .filter(|event| matches!(event, Event::PlayerHit { .. }))
        .count();
    assert_eq!(hits, 1, "invulnerability window follows the first ram");
    assert!(log.contains(&Event::PlayerHit {
        health: 80,
        lives: 3
    }));
}
