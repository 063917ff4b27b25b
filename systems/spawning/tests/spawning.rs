use std::time::Duration;

use elemental_defence_core::{Command, EnemyKind, Event, ResourceLedger};
use elemental_defence_system_spawning::{spawn_interval, Config, WaveScheduler};
use elemental_defence_world::{self as world, query, World};

fn tick(world: &mut World, ledger: &mut ResourceLedger, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, ledger, Command::Tick { dt }, &mut events);
    events
}

#[test]
fn first_wave_spawns_one_enemy_per_interval_across_lanes() {
    let mut world = World::new();
    let mut ledger = ResourceLedger::default();
    let mut scheduler = WaveScheduler::new(Config::new(0x1234_5678, EnemyKind::ALL.to_vec()));
    let path_count = query::path_network(&world).len();
    let plan = scheduler.start_wave().expect("wave starts");

    let mut spawned = Vec::new();
    let mut ticks = 0;
    while scheduler.spawned() < plan.enemies {
        ticks += 1;
        assert!(ticks < 1000, "wave never finished spawning");
        let events = tick(&mut world, &mut ledger, Duration::from_millis(100));
        let mut commands = Vec::new();
        scheduler.handle(&events, path_count, &mut commands);
        for command in commands {
            let mut spawn_events = Vec::new();
            world::apply(&mut world, &mut ledger, command, &mut spawn_events);
            spawned.extend(spawn_events.into_iter().filter_map(|event| match event {
                Event::EnemySpawned { enemy, path, .. } => Some((enemy, path)),
                _ => None,
            }));
        }
    }

    assert_eq!(spawned.len(), 5);
    assert_eq!(ticks, 5 * 16, "one spawn every {:?}", spawn_interval(1));
    assert_eq!(query::live_enemy_count(&world), 5);
    assert!(spawned
        .iter()
        .all(|(_, path)| (path.get() as usize) < path_count));
}

#[test]
fn wave_clears_only_after_the_field_is_empty() {
    let mut world = World::new();
    let mut ledger = ResourceLedger::default();
    let mut scheduler = WaveScheduler::new(Config::new(3, vec![EnemyKind::Goblin]));
    let _ = scheduler.start_wave().expect("wave starts");

    let events = tick(&mut world, &mut ledger, Duration::from_secs(10));
    let mut commands = Vec::new();
    scheduler.handle(&events, query::path_network(&world).len(), &mut commands);
    for command in commands {
        let mut ignored = Vec::new();
        world::apply(&mut world, &mut ledger, command, &mut ignored);
    }

    assert_eq!(
        scheduler.clear_wave(query::live_enemy_count(&world)),
        None,
        "goblins are still on the field"
    );

    for enemy in query::enemy_view(&world).into_vec() {
        let mut ignored = Vec::new();
        world::apply(
            &mut world,
            &mut ledger,
            Command::AdvanceEnemy {
                enemy: enemy.id,
                progress: f32::MAX,
            },
            &mut ignored,
        );
    }

    assert_eq!(scheduler.clear_wave(query::live_enemy_count(&world)), Some(1));
    assert_eq!(scheduler.wave(), 2);
    assert_eq!(scheduler.start_wave().map(|plan| plan.enemies), Ok(12));
}
