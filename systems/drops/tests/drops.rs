use starfall_core::{Command, Event, TICK_DURATION};
use starfall_system_drops::{Config, Drops, AMBIENT_INTERVAL};
use starfall_world::{self as world, query, World};

fn step(world: &mut World, drops: &mut Drops, log: &mut Vec<Event>) {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: TICK_DURATION }, &mut events);
    while !events.is_empty() {
        let mut commands = Vec::new();
        drops.handle(&events, &query::playfield(world), &mut commands);
        log.append(&mut events);
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}

#[test]
fn ambient_power_up_falls_from_the_top_edge() {
    let mut world = World::with_seed(2);
    let mut drops = Drops::new(Config::new(2));
    let mut log = Vec::new();

    for _ in 0..AMBIENT_INTERVAL {
        step(&mut world, &mut drops, &mut log);
    }

    let spawned: Vec<_> = log
        .iter()
        .filter_map(|event| match event {
            Event::PowerUpSpawned { position, .. } => Some(*position),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 1);
    assert!(spawned[0].y < 0.0);
    assert_eq!(query::combat_view(&world).power_ups.len(), 1);
}

#[test]
fn reset_replays_the_same_drops() {
    let mut world = World::with_seed(8);
    let mut drops = Drops::new(Config::new(8));

    let mut first = Vec::new();
    for _ in 0..AMBIENT_INTERVAL {
        step(&mut world, &mut drops, &mut first);
    }

    let mut events = Vec::new();
    world::apply(&mut world, Command::ResetSession, &mut events);
    let mut commands = Vec::new();
    drops.handle(&events, &query::playfield(&world), &mut commands);
    assert!(commands.is_empty());

    let mut second = Vec::new();
    for _ in 0..AMBIENT_INTERVAL {
        step(&mut world, &mut drops, &mut second);
    }

    let kinds = |log: &[Event]| -> Vec<Event> {
        log.iter()
            .filter(|event| matches!(event, Event::PowerUpSpawned { .. }))
            .cloned()
            .collect()
    };
    assert_eq!(kinds(&first), kinds(&second));
}
