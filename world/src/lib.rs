#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! Every mutation flows through [`apply`]. A [`Command::Tick`] runs the frame
//! in three phases: enemies move and derive their sprite state, towers tick
//! against the moved enemies, and finally dead or escaped enemies are removed.

mod enemies;
mod tiles;
mod towers;

use std::sync::Arc;

use path_defence_core::{
    Command, Event, Path, PlacementError, Timestamp, UpgradeError, DEFAULT_TILE_SIZE,
    WELCOME_BANNER,
};
use tracing::{debug, info, trace, warn};

pub use enemies::{DamageOutcome, Enemy, MotionOutcome};
pub use tiles::TileMap;
pub use towers::Tower;

use enemies::EnemyRegistry;
use towers::TowerRegistry;

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tile_map: TileMap,
    path: Option<Arc<Path>>,
    enemies: EnemyRegistry,
    towers: TowerRegistry,
    now: Timestamp,
    tick_index: u64,
}

impl World {
    /// Creates an empty world; no enemy can spawn until a level is configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            tile_map: TileMap::empty(DEFAULT_TILE_SIZE),
            path: None,
            enemies: EnemyRegistry::new(),
            towers: TowerRegistry::new(),
            now: Timestamp::ZERO,
            tick_index: 0,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLevel {
            columns,
            rows,
            tile_size,
            tiles,
            path,
        } => {
            let waypoints = path.len();
            world.tile_map = TileMap::new(columns, rows, tile_size, tiles);
            world.path = Some(Arc::new(path));
            world.enemies.clear();
            world.towers.clear();
            info!(columns, rows, waypoints, "level configured");
            out_events.push(Event::LevelConfigured {
                columns,
                rows,
                waypoints,
            });
        }
        Command::SpawnEnemy { archetype } => {
            let Some(path) = world.path.clone() else {
                warn!(?archetype, "spawn requested before a level was configured");
                out_events.push(Event::SpawnRejected { archetype });
                return;
            };
            let enemy = world.enemies.spawn(archetype, path);
            debug!(enemy = enemy.id().get(), ?archetype, "enemy spawned");
            out_events.push(Event::EnemySpawned {
                enemy: enemy.id(),
                archetype,
                position: enemy.position(),
            });
        }
        Command::PlaceTower { kind, tile } => {
            let rejection = if !world.tile_map.contains(tile) {
                Some(PlacementError::OutOfBounds)
            } else if !world.tile_map.is_buildable(tile) {
                Some(PlacementError::NotBuildable)
            } else if world.towers.is_occupied(tile) {
                Some(PlacementError::Occupied)
            } else {
                None
            };

            if let Some(reason) = rejection {
                debug!(?tile, ?reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, tile, reason });
                return;
            }

            let tower = world
                .towers
                .place(kind, tile, world.tile_map.tile_size(), world.now);
            debug!(tower = tower.id().get(), ?tile, "tower placed");
            out_events.push(Event::TowerPlaced {
                tower: tower.id(),
                kind,
                tile,
                center: tower.center(),
            });
        }
        Command::SelectTower { tile } => {
            let _ = world.towers.clear_selection();
            let Some(id) = world.towers.tower_at(tile).map(Tower::id) else {
                return;
            };
            if let Some(tower) = world.towers.get_mut(id) {
                tower.set_selected(true);
                out_events.push(Event::TowerSelected { tower: id });
            }
        }
        Command::ClearSelection => {
            let _ = world.towers.clear_selection();
            out_events.push(Event::SelectionCleared);
        }
        Command::UpgradeTower { tower } => {
            let result = match world.towers.get_mut(tower) {
                Some(entry) => entry.upgrade(),
                None => Err(UpgradeError::MissingTower),
            };
            match result {
                Ok(level) => {
                    debug!(tower = tower.get(), level, "tower upgraded");
                    out_events.push(Event::TowerUpgraded { tower, level });
                }
                Err(reason) => {
                    debug!(tower = tower.get(), ?reason, "tower upgrade rejected");
                    out_events.push(Event::TowerUpgradeRejected { tower, reason });
                }
            }
        }
        Command::Tick { now } => {
            world.now = now;
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { now });

            advance_enemies(&mut world.enemies, out_events);

            for tower in world.towers.iter_mut() {
                tower.tick(&mut world.enemies, now, out_events);
            }

            let removed = world.enemies.remove_pending();
            if !removed.is_empty() {
                trace!(
                    tick = world.tick_index,
                    removed = removed.len(),
                    "enemies removed"
                );
            }
        }
    }
}

fn advance_enemies(enemies: &mut EnemyRegistry, out_events: &mut Vec<Event>) {
    for enemy in enemies.iter_mut() {
        match enemy.update() {
            MotionOutcome::Moving => {}
            MotionOutcome::ReachedWaypoint { waypoint } => {
                out_events.push(Event::EnemyReachedWaypoint {
                    enemy: enemy.id(),
                    waypoint,
                });
            }
            MotionOutcome::ReachedEnd => {
                debug!(enemy = enemy.id().get(), "enemy leaked");
                out_events.push(Event::EnemyLeaked {
                    enemy: enemy.id(),
                    archetype: enemy.archetype(),
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use path_defence_core::{EnemyView, Path, TilePosition, Timestamp, TowerId, TowerView};

    use super::{TileMap, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the configured tile map.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.tile_map
    }

    /// Waypoint path enemies walk along, once a level is configured.
    #[must_use]
    pub fn path(world: &World) -> Option<&Path> {
        world.path.as_deref()
    }

    /// Time of the most recently simulated frame.
    #[must_use]
    pub fn now(world: &World) -> Timestamp {
        world.now
    }

    /// Number of frames simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Tower standing on the tile, if any.
    #[must_use]
    pub fn tower_at(world: &World, tile: TilePosition) -> Option<TowerId> {
        world.towers.tower_at(tile).map(|tower| tower.id())
    }

    /// Reports whether the tile is grass inside the map.
    #[must_use]
    pub fn is_buildable(world: &World, tile: TilePosition) -> bool {
        world.tile_map.is_buildable(tile)
    }

    /// Reports whether a tower already stands on the tile.
    #[must_use]
    pub fn is_occupied(world: &World, tile: TilePosition) -> bool {
        world.towers.is_occupied(tile)
    }

    /// Number of enemies still on the map.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }
}
