use path_defence_core::{
    Clock, Command, EnemyArchetype, EnemyId, Event, FixedStepClock, Path, TileId, TilePosition,
    TowerKind, GRASS_TILE,
};
use path_defence_world::{self as world, query, World};

const ROAD: TileId = TileId::new(24);

fn configured_world() -> World {
    let mut tiles = vec![GRASS_TILE; 25];
    for column in 0..5 {
        tiles[2 * 5 + column] = ROAD;
    }
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureLevel {
            columns: 5,
            rows: 5,
            tile_size: 64.0,
            tiles,
            path: Path::from_pairs([(0.0, 160.0), (320.0, 160.0)]).expect("valid path"),
        },
        &mut events,
    );
    world
}

fn issue(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

/// Ticks the world `frames` times at 60 FPS, returning the events of every frame.
fn run(world: &mut World, clock: &mut FixedStepClock, frames: usize) -> Vec<Vec<Event>> {
    (0..frames)
        .map(|_| issue(world, Command::Tick { now: clock.tick() }))
        .collect()
}

fn place_tower(world: &mut World, column: u32, row: u32) {
    let events = issue(
        world,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            tile: TilePosition::new(column, row),
        },
    );
    assert!(matches!(events.as_slice(), [Event::TowerPlaced { .. }]));
}

fn spawn(world: &mut World, archetype: EnemyArchetype) -> EnemyId {
    match issue(world, Command::SpawnEnemy { archetype }).as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected spawn events: {other:?}"),
    }
}

#[test]
fn swarm_in_range_is_killed_once_and_rewarded() {
    let mut world = configured_world();
    let mut clock = FixedStepClock::new(60);
    place_tower(&mut world, 2, 1);
    let swarm = spawn(&mut world, EnemyArchetype::Swarm);

    let frames = run(&mut world, &mut clock, 120);

    let kills: Vec<(usize, &Event)> = frames
        .iter()
        .enumerate()
        .flat_map(|(index, events)| events.iter().map(move |event| (index + 1, event)))
        .filter(|(_, event)| matches!(event, Event::EnemyKilled { .. }))
        .collect();
    assert_eq!(
        kills,
        vec![(
            97,
            &Event::EnemyKilled {
                enemy: swarm,
                archetype: EnemyArchetype::Swarm,
                reward: 5,
            }
        )]
    );
    assert!(frames
        .iter()
        .flatten()
        .all(|event| !matches!(event, Event::EnemyLeaked { .. })));
    assert_eq!(query::enemy_count(&world), 0);
}

#[test]
fn killed_enemy_is_removed_within_the_same_tick() {
    let mut world = configured_world();
    let mut clock = FixedStepClock::new(60);
    place_tower(&mut world, 2, 1);
    let _ = spawn(&mut world, EnemyArchetype::Swarm);

    let _ = run(&mut world, &mut clock, 96);
    assert_eq!(query::enemy_count(&world), 1);
    let _ = run(&mut world, &mut clock, 1);
    assert_eq!(query::enemy_count(&world), 0);
    let tower = query::tower_view(&world).into_vec()[0];
    assert!(tower.target.is_none());
}

#[test]
fn target_is_acquired_only_after_the_cooldown_window() {
    let mut world = configured_world();
    let mut clock = FixedStepClock::new(60);
    place_tower(&mut world, 2, 1);
    let swarm = spawn(&mut world, EnemyArchetype::Swarm);

    let frames = run(&mut world, &mut clock, 91);

    let acquired: Vec<usize> = frames
        .iter()
        .enumerate()
        .filter(|(_, events)| {
            events.iter().any(|event| {
                matches!(event, Event::TowerTargetAcquired { enemy, .. } if *enemy == swarm)
            })
        })
        .map(|(index, _)| index + 1)
        .collect();
    assert_eq!(acquired, vec![91]);
}

#[test]
fn leaking_enemy_yields_no_reward() {
    let mut world = configured_world();
    let mut clock = FixedStepClock::new(60);
    let fast = spawn(&mut world, EnemyArchetype::Fast);

    let frames = run(&mut world, &mut clock, 110);

    let leaked_on: Vec<usize> = frames
        .iter()
        .enumerate()
        .filter(|(_, events)| events.contains(&Event::EnemyLeaked {
            enemy: fast,
            archetype: EnemyArchetype::Fast,
        }))
        .map(|(index, _)| index + 1)
        .collect();
    assert_eq!(leaked_on, vec![108]);
    assert!(frames
        .iter()
        .flatten()
        .all(|event| !matches!(event, Event::EnemyKilled { .. })));
    assert_eq!(query::enemy_count(&world), 0);
}

#[test]
fn motion_events_precede_tower_events_within_a_tick() {
    let mut world = configured_world();
    let mut clock = FixedStepClock::new(60);
    place_tower(&mut world, 2, 1);
    let _ = spawn(&mut world, EnemyArchetype::Swarm);

    let frames = run(&mut world, &mut clock, 97);
    let final_frame = &frames[96];

    assert!(matches!(final_frame.first(), Some(Event::TimeAdvanced { .. })));
    let fired = final_frame
        .iter()
        .position(|event| matches!(event, Event::TowerFired { .. }))
        .expect("tower fires on frame 97");
    let killed = final_frame
        .iter()
        .position(|event| matches!(event, Event::EnemyKilled { .. }))
        .expect("swarm dies on frame 97");
    assert!(fired < killed);
}

#[test]
fn tank_survives_repeated_hits_and_leaks() {
    let mut world = configured_world();
    let mut clock = FixedStepClock::new(60);
    place_tower(&mut world, 2, 1);
    let tank = spawn(&mut world, EnemyArchetype::Tank);

    let frames = run(&mut world, &mut clock, 330);

    let remaining: Vec<i32> = frames
        .iter()
        .flatten()
        .filter_map(|event| match event {
            Event::EnemyDamaged {
                enemy,
                remaining_health,
            } if *enemy == tank => Some(*remaining_health),
            _ => None,
        })
        .collect();
    assert!(!remaining.is_empty());
    for (hit, health) in remaining.iter().enumerate() {
        assert_eq!(*health, 200 - 25 * (hit as i32 + 1));
    }
    assert!(frames.iter().flatten().any(|event| event
        == &Event::EnemyLeaked {
            enemy: tank,
            archetype: EnemyArchetype::Tank,
        }));
    assert!(frames
        .iter()
        .flatten()
        .all(|event| !matches!(event, Event::EnemyKilled { .. })));
}

#[test]
fn two_towers_may_attack_the_same_enemy() {
    let mut world = configured_world();
    let mut clock = FixedStepClock::new(60);
    place_tower(&mut world, 2, 1);
    place_tower(&mut world, 2, 3);
    let tank = spawn(&mut world, EnemyArchetype::Tank);

    let frames = run(&mut world, &mut clock, 100);

    let acquired: Vec<_> = frames
        .iter()
        .flatten()
        .filter_map(|event| match event {
            Event::TowerTargetAcquired { tower, enemy, .. } if *enemy == tank => Some(*tower),
            _ => None,
        })
        .collect();
    assert_eq!(acquired.len(), 2);
    assert_ne!(acquired[0], acquired[1]);
}

#[test]
fn towers_cannot_be_placed_on_the_path() {
    let mut world = configured_world();
    let events = issue(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            tile: TilePosition::new(1, 2),
        },
    );

    assert!(matches!(
        events.as_slice(),
        [Event::TowerPlacementRejected { .. }]
    ));
    assert!(!query::is_occupied(&world, TilePosition::new(1, 2)));
}
