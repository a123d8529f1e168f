use glam::Vec2;
use path_defence_core::{Command, Event, Path, TilePosition, TowerId, TowerKind, GRASS_TILE};
use path_defence_system_builder::{Builder, BuilderInput, ShopLayout};
use path_defence_world::{self as world, query, World};

const BUY: Vec2 = Vec2::new(350.0, 130.0);
const CANCEL: Vec2 = Vec2::new(350.0, 190.0);
const UPGRADE: Vec2 = Vec2::new(350.0, 250.0);

fn shop() -> Builder {
    Builder::new(ShopLayout::new(5, 5, 64.0))
}

fn step(builder: &mut Builder, world: &mut World, events: &mut Vec<Event>, at: Vec2) {
    let commands = press(builder, events.as_slice(), at);
    events.clear();
    for command in commands {
        world::apply(world, command, events);
    }
}

fn press(builder: &mut Builder, events: &[Event], position: Vec2) -> Vec<Command> {
    let mut commands = Vec::new();
    builder.handle(events, BuilderInput::click(position), &mut commands);
    builder.handle(&[], BuilderInput::release(position), &mut commands);
    commands
}

#[test]
fn click_in_play_area_selects_when_not_placing() {
    let mut builder = shop();

    let commands = press(&mut builder, &[], Vec2::new(100.0, 70.0));

    assert_eq!(
        commands,
        vec![
            Command::ClearSelection,
            Command::SelectTower {
                tile: TilePosition::new(1, 1),
            },
        ],
        "clicks outside placing mode select the tower under the cursor",
    );
}

#[test]
fn buy_button_enters_placing_mode() {
    let mut builder = shop();

    assert!(press(&mut builder, &[], BUY).is_empty());
    assert!(builder.placing());

    let commands = press(&mut builder, &[], Vec2::new(10.0, 300.0));
    assert_eq!(
        commands,
        vec![
            Command::ClearSelection,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                tile: TilePosition::new(0, 4),
            },
        ],
    );
    assert!(builder.placing(), "placing mode persists after a placement");
}

#[test]
fn cancel_button_leaves_placing_mode() {
    let mut builder = shop();
    let _ = press(&mut builder, &[], BUY);

    let _ = press(&mut builder, &[], CANCEL);

    assert!(!builder.placing());
    let commands = press(&mut builder, &[], Vec2::new(10.0, 10.0));
    assert!(matches!(
        commands.as_slice(),
        [Command::ClearSelection, Command::SelectTower { .. }]
    ));
}

#[test]
fn upgrade_button_requires_a_selected_tower() {
    let mut builder = shop();
    assert!(press(&mut builder, &[], UPGRADE).is_empty());

    let selected = [Event::TowerSelected {
        tower: TowerId::new(3),
    }];
    let commands = press(&mut builder, &selected, UPGRADE);
    assert_eq!(
        commands,
        vec![Command::UpgradeTower {
            tower: TowerId::new(3),
        }],
    );

    let commands = press(&mut builder, &[Event::SelectionCleared], UPGRADE);
    assert!(commands.is_empty(), "cleared selection disables upgrades");
}

#[test]
fn clicks_in_the_shop_panel_do_not_reach_the_map() {
    let mut builder = shop();
    let commands = press(&mut builder, &[], Vec2::new(330.0, 10.0));
    assert!(commands.is_empty());
}

#[test]
fn shop_drives_world_placement_selection_and_upgrade() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureLevel {
            columns: 5,
            rows: 5,
            tile_size: 64.0,
            tiles: vec![GRASS_TILE; 25],
            path: Path::from_pairs([(0.0, 0.0), (320.0, 0.0)]).expect("valid path"),
        },
        &mut events,
    );
    let mut builder = shop();

    step(&mut builder, &mut world, &mut events, BUY);
    step(&mut builder, &mut world, &mut events, Vec2::new(160.0, 160.0));
    assert_eq!(
        query::tower_at(&world, TilePosition::new(2, 2)),
        Some(TowerId::new(0))
    );

    step(&mut builder, &mut world, &mut events, CANCEL);
    step(&mut builder, &mut world, &mut events, Vec2::new(150.0, 150.0));
    assert_eq!(builder.selected(), None, "selection arrives with the next frame");
    step(&mut builder, &mut world, &mut events, UPGRADE);
    assert_eq!(builder.selected(), Some(TowerId::new(0)));

    let tower = query::tower_view(&world).into_vec()[0];
    assert!(tower.selected);
    assert_eq!(tower.level, 1);
}
