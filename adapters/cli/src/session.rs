//! Frame loop wiring the world to the shop and spawning systems.

use glam::Vec2;
use path_defence_core::{Clock, Command, Event, FixedStepClock, TilePosition, TowerKind};
use path_defence_rendering::{FrameInput, PanelButton, RenderingError, Scene, WeaponSheet};
use path_defence_system_builder::{Builder, BuilderInput, PointerState, ShopLayout};
use path_defence_system_spawning::{Config, Spawning};
use path_defence_world::{self as world, query, World};
use tracing::{debug, info};

use crate::{level::Level, settings::Settings};

const BUTTON_LABELS: [&str; 3] = ["buy", "cancel", "upgrade"];

/// Running totals credited from world events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Ledger {
    pub(crate) gold: u64,
    pub(crate) kills: u32,
    pub(crate) leaks: u32,
    pub(crate) spawned: u32,
    pub(crate) towers: u32,
}

impl Ledger {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.spawned += 1,
                Event::EnemyKilled { reward, .. } => {
                    self.kills += 1;
                    self.gold += u64::from(*reward);
                }
                Event::EnemyLeaked { .. } => self.leaks += 1,
                Event::TowerPlaced { .. } => self.towers += 1,
                _ => {}
            }
        }
    }
}

/// One playthrough of a level.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    builder: Builder,
    spawning: Spawning,
    clock: FixedStepClock,
    weapon_sheet: WeaponSheet,
    play_area: Vec2,
    events: Vec<Event>,
    ledger: Ledger,
}

impl Session {
    pub(crate) fn new(level: &Level, settings: &Settings) -> Result<Self, RenderingError> {
        let mut config = Config::new(settings.spawn_interval(), settings.seed);
        if let Some(limit) = settings.spawn_limit {
            config = config.with_limit(limit);
        }
        let layout = ShopLayout::new(level.columns, level.rows, level.tile_size);

        let mut session = Self {
            world: World::new(),
            builder: Builder::new(layout),
            spawning: Spawning::new(config),
            clock: FixedStepClock::new(settings.fps),
            weapon_sheet: WeaponSheet::for_kind(TowerKind::Basic)?,
            play_area: layout.play_area(),
            events: Vec::new(),
            ledger: Ledger::default(),
        };
        session.apply(level.configure_command());
        let configured = std::mem::take(&mut session.events);
        session.spawning.handle(&configured, &mut Vec::new());
        session.events = configured;
        Ok(session)
    }

    pub(crate) const fn ledger(&self) -> Ledger {
        self.ledger
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Whether the wave is over and the map is empty.
    pub(crate) fn finished(&self) -> bool {
        self.spawning.exhausted() && query::enemy_count(&self.world) == 0
    }

    /// Screen positions a player would click to build towers on `tiles`.
    pub(crate) fn placement_script(&self, tiles: &[TilePosition]) -> Vec<FrameInput> {
        if tiles.is_empty() {
            return Vec::new();
        }
        let [buy, cancel, _] = self.builder.button_rects();
        let tile_size = query::tile_map(&self.world).tile_size();

        let mut targets = vec![buy.origin + buy.size * 0.5];
        targets.extend(tiles.iter().map(|tile| tile.center(tile_size)));
        targets.push(cancel.origin + cancel.size * 0.5);

        targets
            .into_iter()
            .flat_map(|cursor| {
                [
                    FrameInput {
                        cursor,
                        pressed: true,
                        clicked: true,
                    },
                    FrameInput {
                        cursor,
                        pressed: false,
                        clicked: false,
                    },
                ]
            })
            .collect()
    }

    /// Runs one frame: shop input, simulation tick, then spawning.
    pub(crate) fn frame(&mut self, input: FrameInput) {
        let previous = std::mem::take(&mut self.events);
        let mut commands = Vec::new();
        self.builder.handle(
            &previous,
            BuilderInput::new(PointerState::new(input.cursor, input.pressed), input.clicked),
            &mut commands,
        );
        for command in commands {
            self.apply(command);
        }

        let now = self.clock.tick();
        self.apply(Command::Tick { now });

        let mut spawns = Vec::new();
        self.spawning.handle(&self.events, &mut spawns);
        for command in spawns {
            self.apply(command);
        }
    }

    /// Rebuilds `scene` from the current world state.
    pub(crate) fn refresh(&self, input: FrameInput, scene: &mut Scene) {
        *scene = Scene::from_views(
            self.play_area,
            &query::enemy_view(&self.world),
            &query::tower_view(&self.world),
            &self.weapon_sheet,
        );
        scene.buttons = self
            .builder
            .button_rects()
            .iter()
            .zip(BUTTON_LABELS)
            .map(|(rect, label)| PanelButton::new(label, rect.origin, rect.size))
            .collect();
        scene.placement_cursor = self.builder.placing().then_some(input.cursor);
    }

    fn apply(&mut self, command: Command) {
        let start = self.events.len();
        world::apply(&mut self.world, command, &mut self.events);
        let generated = &self.events[start..];
        for event in generated {
            match event {
                Event::TowerPlacementRejected { tile, reason, .. } => {
                    info!(?tile, ?reason, "tower placement rejected");
                }
                Event::EnemyKilled { enemy, reward, .. } => {
                    debug!(?enemy, reward, "enemy killed");
                }
                _ => {}
            }
        }
        self.ledger.record(generated);
    }
}
