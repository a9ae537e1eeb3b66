use glam::Vec2;
use starfall_core::{
    Command, DestroyCause, DifficultyScale, EnemyId, EnemyKind, Event, MovementPattern,
    PowerUpId, PowerUpKind, TargetRef, TimedEffect, WeaponKind, TICK_DURATION,
};
use starfall_world::{self as world, query, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn tick(world: &mut World) -> Vec<Event> {
    run(world, Command::Tick { dt: TICK_DURATION })
}

fn spawn_enemy(world: &mut World, kind: EnemyKind, position: Vec2) -> EnemyId {
    let events = run(
        world,
        Command::SpawnEnemy {
            kind,
            position,
            scale: DifficultyScale::UNIT,
            pattern: Some(MovementPattern::Straight),
        },
    );
    events
        .iter()
        .find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .expect("enemy spawned")
}

fn spawn_power_up(world: &mut World, kind: PowerUpKind) -> PowerUpId {
    let events = run(
        world,
        Command::SpawnPowerUp {
            kind,
            position: Vec2::new(20.0, 20.0),
        },
    );
    events
        .iter()
        .find_map(|event| match event {
            Event::PowerUpSpawned { power_up, .. } => Some(*power_up),
            _ => None,
        })
        .expect("power-up spawned")
}

/// Ticks until the equipped weapon fires, returning the events of the shot.
fn fire(world: &mut World) -> Vec<Event> {
    for _ in 0..10 {
        let events = run(world, Command::FireWeapon);
        if events
            .iter()
            .any(|event| matches!(event, Event::WeaponFired { .. }))
        {
            return events;
        }
        let _ = tick(world);
    }
    panic!("weapon never fired");
}

fn has_notification(events: &[Event], expected: &str) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::Notification { text, .. } if text == expected))
}

#[test]
fn projectile_kill_awards_enemy_score() {
    let mut world = World::new();
    let enemy = spawn_enemy(&mut world, EnemyKind::Small, Vec2::new(100.0, 50.0));

    let mut log = Vec::new();
    for _ in 0..2 {
        let _ = fire(&mut world);
        let view = query::combat_view(&world);
        let projectile = view.projectiles.last().expect("projectile in flight").id;
        log.extend(run(
            &mut world,
            Command::ResolveProjectileHit {
                projectile,
                target: TargetRef::Enemy(enemy),
            },
        ));
    }

    assert!(log.contains(&Event::EnemyDamaged {
        enemy,
        damage: 10,
        remaining: 5,
    }));
    assert!(log.iter().any(|event| matches!(
        event,
        Event::EnemyDestroyed {
            enemy: destroyed,
            cause: DestroyCause::Projectile,
            ..
        } if *destroyed == enemy
    )));
    assert!(log.contains(&Event::ScoreAwarded {
        amount: 10,
        total: 10
    }));
    assert_eq!(query::score(&world), 10);
    assert_eq!(query::live_enemy_count(&world), 0);
}

#[test]
fn boss_defeat_drops_three_spoils() {
    let mut world = World::new();
    let _ = run(&mut world, Command::SpawnBoss { level: 1 });
    let boss = query::combat_view(&world).boss.expect("boss present").id;

    let mut defeated = false;
    for _ in 0..200 {
        let _ = fire(&mut world);
        let projectile = query::combat_view(&world)
            .projectiles
            .last()
            .expect("projectile in flight")
            .id;
        let events = run(
            &mut world,
            Command::ResolveProjectileHit {
                projectile,
                target: TargetRef::Boss(boss),
            },
        );
        if events
            .iter()
            .any(|event| matches!(event, Event::BossDefeated { level: 1, .. }))
        {
            assert!(has_notification(&events, "BOSS DEFEATED!"));
            defeated = true;
            break;
        }
    }
    assert!(defeated, "boss survived the barrage");
    assert_eq!(query::score(&world), 800);
    assert!(!query::boss_alive(&world));

    let mut spoils = 0;
    for _ in 0..60 {
        spoils += tick(&mut world)
            .iter()
            .filter(|event| matches!(event, Event::SpoilsDropped { .. }))
            .count();
    }
    assert_eq!(spoils, 3);
    assert!(query::boss_status(&world).is_none());
}

#[test]
fn godmode_blocks_ramming_damage() {
    let mut world = World::new();
    let enemy = spawn_enemy(&mut world, EnemyKind::Medium, Vec2::new(300.0, 300.0));
    let power_up = spawn_power_up(&mut world, PowerUpKind::Godmode);

    let events = run(&mut world, Command::CollectPowerUp { power_up });
    assert!(has_notification(&events, "GOD MODE ACTIVATED"));

    let status = query::player_status(&world);
    assert!(status.godmode);
    assert!(status.effects.contains(&(TimedEffect::Godmode, 600)));

    let events = run(
        &mut world,
        Command::ResolveRam {
            target: TargetRef::Enemy(enemy),
        },
    );
    assert!(events.is_empty());
    assert_eq!(query::player_status(&world).snapshot.health, 100);

    let again = run(&mut world, Command::CollectPowerUp { power_up });
    assert!(again.is_empty(), "collected power-ups cannot be reused");
}

#[test]
fn ramming_hurts_both_sides() {
    let mut world = World::new();
    let enemy = spawn_enemy(&mut world, EnemyKind::Large, Vec2::new(300.0, 300.0));

    let events = run(
        &mut world,
        Command::ResolveRam {
            target: TargetRef::Enemy(enemy),
        },
    );
    assert!(events.contains(&Event::EnemyDamaged {
        enemy,
        damage: 20,
        remaining: 50,
    }));
    assert!(events.contains(&Event::PlayerHit {
        health: 80,
        lives: 3
    }));

    let repeat = run(
        &mut world,
        Command::ResolveRam {
            target: TargetRef::Enemy(enemy),
        },
    );
    assert!(repeat.is_empty(), "invulnerability gates repeated rams");
}

#[test]
fn missiles_home_in_and_destroy_their_target() {
    let mut world = World::new();
    let power_up = spawn_power_up(&mut world, PowerUpKind::Missile);
    let events = run(&mut world, Command::CollectPowerUp { power_up });
    assert!(has_notification(&events, "+5 MISSILES"));
    assert_eq!(query::player_status(&world).missiles, 5);

    let enemy = spawn_enemy(&mut world, EnemyKind::Large, Vec2::new(376.0, 250.0));
    let events = run(&mut world, Command::LaunchMissiles);
    assert!(events.contains(&Event::MissilesLaunched {
        count: 5,
        remaining: 0
    }));

    let mut struck = false;
    let mut destroyed = false;
    for _ in 0..120 {
        for event in tick(&mut world) {
            match event {
                Event::MissileDetonated {
                    struck: Some(TargetRef::Enemy(target)),
                    ..
                } if target == enemy => struck = true,
                Event::EnemyDestroyed { enemy: target, .. } if target == enemy => {
                    destroyed = true;
                }
                _ => {}
            }
        }
    }
    assert!(struck, "no missile reached the target");
    assert!(destroyed, "target survived the salvo");
}

#[test]
fn weapon_switching_requires_ammo() {
    let mut world = World::new();
    let events = run(
        &mut world,
        Command::SelectWeapon {
            weapon: WeaponKind::Plasma,
        },
    );
    assert!(events.contains(&Event::WeaponChanged {
        weapon: WeaponKind::Plasma
    }));
    assert!(has_notification(&events, "SWITCHED TO PLASMA"));

    let events = fire(&mut world);
    assert!(events.contains(&Event::WeaponFired {
        weapon: WeaponKind::Plasma,
        projectiles: 1,
    }));
    let ammo = query::player_status(&world)
        .ammo
        .into_iter()
        .find(|(weapon, _)| *weapon == WeaponKind::Plasma)
        .and_then(|(_, ammo)| ammo);
    assert_eq!(ammo, Some(99));
}

#[test]
fn waves_announce_themselves() {
    let mut world = World::new();
    let events = run(&mut world, Command::StartWave { wave: 3 });
    assert!(events.contains(&Event::WaveStarted {
        wave: 3,
        boss_wave: false
    }));
    assert!(has_notification(&events, "WAVE 3"));

    let events = run(
        &mut world,
        Command::EndWave {
            wave: 3,
            boss_next: false,
        },
    );
    assert!(has_notification(&events, "WAVE COMPLETE"));

    let events = run(&mut world, Command::StartWave { wave: 10 });
    assert!(events.contains(&Event::WaveStarted {
        wave: 10,
        boss_wave: true
    }));
    assert!(has_notification(&events, "BOSS WAVE!"));
    assert_eq!(query::wave(&world), 10);
}

#[test]
fn paused_world_ignores_ticks() {
    let mut world = World::new();
    let _ = tick(&mut world);
    let events = run(&mut world, Command::SetPaused { paused: true });
    assert!(events.contains(&Event::Paused));
    assert!(tick(&mut world).is_empty());
    assert_eq!(query::tick(&world), 1);

    let events = run(&mut world, Command::SetPaused { paused: false });
    assert!(has_notification(&events, "GAME RESUMED"));
    let _ = tick(&mut world);
    assert_eq!(query::tick(&world), 2);
}
