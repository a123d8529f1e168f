#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Time never comes from a global source: every
//! tick carries the [`Timestamp`] sampled by the caller's [`Clock`].

mod geometry;
mod path;

pub use geometry::{direction, distance, heading_degrees, step_toward, Step};
pub use path::{Path, PathError};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Defence.";

/// Default side length of a square map tile in pixels.
pub const DEFAULT_TILE_SIZE: f32 = 64.0;

/// Tile identifier of grass, the only terrain towers may be built on.
pub const GRASS_TILE: TileId = TileId::new(119);

/// Number of frames in every enemy walk cycle.
pub const WALK_FRAME_COUNT: usize = 4;

/// Monotonic simulation time measured in whole milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The origin of simulation time.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from a millisecond count.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Millisecond count represented by the timestamp.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, clamped at zero.
    #[must_use]
    pub const fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Source of monotonic timestamps injected into the simulation loop.
pub trait Clock {
    /// Advances to the next frame and reports the current time.
    fn tick(&mut self) -> Timestamp;
}

/// Deterministic clock that advances by exactly one frame per tick.
///
/// Frame times are derived from the frame counter rather than accumulated, so
/// a 60 FPS clock reports 16, 33, 50, ... without drifting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedStepClock {
    frames_per_second: u32,
    frame: u64,
}

impl FixedStepClock {
    /// Creates a clock stepping at the provided frame rate.
    ///
    /// A frame rate of zero is treated as one frame per second.
    #[must_use]
    pub const fn new(frames_per_second: u32) -> Self {
        let frames_per_second = if frames_per_second == 0 {
            1
        } else {
            frames_per_second
        };
        Self {
            frames_per_second,
            frame: 0,
        }
    }

    /// Time of the most recent frame without advancing.
    #[must_use]
    pub const fn now(&self) -> Timestamp {
        Timestamp(self.frame.saturating_mul(1_000) / self.frames_per_second as u64)
    }
}

impl Clock for FixedStepClock {
    fn tick(&mut self) -> Timestamp {
        self.frame = self.frame.saturating_add(1);
        self.now()
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Terrain identifier as exported by the level editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Wraps a raw tile identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single map tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePosition {
    column: u32,
    row: u32,
}

impl TilePosition {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Pixel coordinate of the tile's center.
    #[must_use]
    pub fn center(&self, tile_size: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * tile_size,
            (self.row as f32 + 0.5) * tile_size,
        )
    }

    /// Tile containing the provided pixel coordinate.
    ///
    /// Returns `None` for negative coordinates or a non-positive tile size.
    #[must_use]
    pub fn containing(point: Vec2, tile_size: f32) -> Option<Self> {
        if tile_size <= 0.0 || point.x < 0.0 || point.y < 0.0 || !point.is_finite() {
            return None;
        }
        let column = (point.x / tile_size).floor() as u32;
        let row = (point.y / tile_size).floor() as u32;
        Some(Self::new(column, row))
    }
}

/// Named preset of enemy statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Fragile runner.
    Fast,
    /// Slow, heavily armoured walker.
    Tank,
    /// Weak enemy that arrives in numbers.
    Swarm,
}

impl EnemyArchetype {
    /// Every archetype in declaration order.
    pub const ALL: [Self; 3] = [Self::Fast, Self::Tank, Self::Swarm];

    /// Health the archetype spawns with.
    #[must_use]
    pub const fn max_health(self) -> i32 {
        match self {
            Self::Fast => 50,
            Self::Tank => 200,
            Self::Swarm => 20,
        }
    }

    /// Distance travelled per tick in pixels.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Fast => 3.0,
            Self::Tank => 1.0,
            Self::Swarm => 2.0,
        }
    }

    /// Resources awarded when the enemy is killed.
    #[must_use]
    pub const fn reward(self) -> u32 {
        match self {
            Self::Fast => 10,
            Self::Tank => 30,
            Self::Swarm => 5,
        }
    }

    /// Bundles the archetype's constants into an [`EnemyStats`] descriptor.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        EnemyStats {
            max_health: self.max_health(),
            speed: self.speed(),
            reward: self.reward(),
        }
    }
}

/// Constant parameters an enemy is created with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Health the enemy spawns with.
    pub max_health: i32,
    /// Distance travelled per tick in pixels.
    pub speed: f32,
    /// Resources awarded when the enemy is killed.
    pub reward: u32,
}

/// Walk-cycle orientation chosen from the dominant axis of motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalkDirection {
    /// Moving toward decreasing y.
    Up,
    /// Moving toward increasing y.
    Down,
    /// Moving toward decreasing x.
    Left,
    /// Moving toward increasing x.
    Right,
}

impl WalkDirection {
    /// Every direction in declaration order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Derives the walk direction for a motion vector.
    ///
    /// Horizontal wins only when strictly dominant; otherwise the sign of the
    /// vertical component decides, so a zero vector maps to [`Self::Up`].
    #[must_use]
    pub fn from_motion(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Self::Right
            } else {
                Self::Left
            }
        } else if delta.y > 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }
}

/// Types of towers that can be constructed on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Basic tower with default attack parameters.
    Basic,
}

impl TowerKind {
    /// Targeting radius in pixels.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Basic => 150.0,
        }
    }

    /// Minimum time between attack completions before re-targeting.
    #[must_use]
    pub const fn cooldown_ms(self) -> u64 {
        match self {
            Self::Basic => 1_500,
        }
    }

    /// Damage dealt when an attack animation completes.
    #[must_use]
    pub const fn damage(self) -> i32 {
        match self {
            Self::Basic => 25,
        }
    }

    /// Number of frames in the weapon attack animation.
    #[must_use]
    pub const fn attack_frames(self) -> usize {
        match self {
            Self::Basic => 6,
        }
    }

    /// Time that must pass before the attack animation advances a frame.
    #[must_use]
    pub const fn attack_frame_ms(self) -> u64 {
        match self {
            Self::Basic => 15,
        }
    }

    /// Highest level reachable through upgrades.
    #[must_use]
    pub const fn max_level(self) -> u8 {
        match self {
            Self::Basic => 2,
        }
    }

    /// Weapon angle in degrees before the first target is acquired.
    #[must_use]
    pub const fn initial_angle(self) -> f32 {
        match self {
            Self::Basic => 90.0,
        }
    }
}

/// Serializable motion state sufficient to resume an enemy deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    /// Position in pixels.
    pub position: Vec2,
    /// Index of the waypoint the enemy walks toward.
    pub target_index: usize,
    /// Remaining health.
    pub health: i32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the map and waypoint path, discarding all enemies and towers.
    ConfigureLevel {
        /// Number of tile columns on the map.
        columns: u32,
        /// Number of tile rows on the map.
        rows: u32,
        /// Side length of a tile in pixels.
        tile_size: f32,
        /// Row-major tile identifiers, `columns * rows` entries.
        tiles: Vec<TileId>,
        /// Waypoints enemies walk along.
        path: Path,
    },
    /// Spawns an enemy of the given archetype at the start of the path.
    SpawnEnemy {
        /// Stats preset for the new enemy.
        archetype: EnemyArchetype,
    },
    /// Requests construction of a tower on the provided tile.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Tile the tower should occupy.
        tile: TilePosition,
    },
    /// Marks the tower standing on the tile, if any, as selected.
    SelectTower {
        /// Tile that was clicked.
        tile: TilePosition,
    },
    /// Deselects every tower.
    ClearSelection,
    /// Requests that a tower advance to its next level.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
    },
    /// Advances the simulation by one frame.
    Tick {
        /// Current time sampled from the caller's clock.
        now: Timestamp,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new level was loaded.
    LevelConfigured {
        /// Number of tile columns on the map.
        columns: u32,
        /// Number of tile rows on the map.
        rows: u32,
        /// Number of waypoints in the path.
        waypoints: usize,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Time of the frame that was simulated.
        now: Timestamp,
    },
    /// Confirms that an enemy entered the map.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Stats preset of the enemy.
        archetype: EnemyArchetype,
        /// Spawn position in pixels.
        position: Vec2,
    },
    /// Reports that a spawn request was dropped because no level is loaded.
    SpawnRejected {
        /// Archetype that was requested.
        archetype: EnemyArchetype,
    },
    /// Reports that an enemy reached a waypoint and now heads for the next one.
    EnemyReachedWaypoint {
        /// Enemy that arrived.
        enemy: EnemyId,
        /// Index of the waypoint it snapped onto.
        waypoint: usize,
    },
    /// Reports that an enemy walked past the end of the path alive.
    EnemyLeaked {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Stats preset of the enemy.
        archetype: EnemyArchetype,
    },
    /// Confirms that a tower was placed on the map.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Tile the tower occupies.
        tile: TilePosition,
        /// Pixel center of the tower.
        center: Vec2,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Tile provided in the placement request.
        tile: TilePosition,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower became the selected tower.
    TowerSelected {
        /// Tower that is now selected.
        tower: TowerId,
    },
    /// Confirms that no tower is selected any more.
    SelectionCleared,
    /// Confirms that a tower advanced a level.
    TowerUpgraded {
        /// Upgraded tower.
        tower: TowerId,
        /// Level reached.
        level: u8,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Tower named by the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Reports that a tower locked onto an enemy.
    TowerTargetAcquired {
        /// Tower that acquired a target.
        tower: TowerId,
        /// Enemy it aims at.
        enemy: EnemyId,
        /// Weapon angle in degrees.
        angle_degrees: f32,
    },
    /// Reports that a tower dropped a target that left the registry or died.
    TowerTargetLost {
        /// Tower that lost its target.
        tower: TowerId,
        /// Enemy that can no longer be attacked.
        enemy: EnemyId,
    },
    /// Reports that a tower completed its attack animation.
    TowerFired {
        /// Tower that attacked.
        tower: TowerId,
        /// Enemy that was attacked.
        enemy: EnemyId,
    },
    /// Reports that an enemy survived a hit.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Health left after the hit.
        remaining_health: i32,
    },
    /// Reports that an enemy died; adapters credit `reward` to the player.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Stats preset of the enemy.
        archetype: EnemyArchetype,
        /// Resources awarded for the kill.
        reward: u32,
    },
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested tile lies outside the map.
    OutOfBounds,
    /// The requested tile is not grass.
    NotBuildable,
    /// Another tower already stands on the tile.
    Occupied,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The tower already reached its highest level.
    MaxLevel,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Stats preset of the enemy.
    pub archetype: EnemyArchetype,
    /// Position in pixels.
    pub position: Vec2,
    /// Index of the waypoint the enemy walks toward.
    pub target_index: usize,
    /// Remaining health.
    pub health: i32,
    /// Heading toward the current waypoint in degrees.
    pub facing_degrees: f32,
    /// Walk-cycle orientation.
    pub direction: WalkDirection,
    /// Walk-cycle frame in `0..WALK_FRAME_COUNT`.
    pub frame: usize,
}

/// Read-only snapshot describing all enemies on the map.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile occupied by the tower.
    pub tile: TilePosition,
    /// Pixel center of the tower.
    pub center: Vec2,
    /// Upgrade level in `0..=kind.max_level()`.
    pub level: u8,
    /// Whether the player selected the tower.
    pub selected: bool,
    /// Targeting radius in pixels.
    pub range: f32,
    /// Weapon angle in degrees.
    pub angle_degrees: f32,
    /// Enemy the tower is currently attacking.
    pub target: Option<EnemyId>,
    /// Current weapon animation frame in `0..kind.attack_frames()`.
    pub attack_frame: usize,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Tower currently selected by the player, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&TowerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.selected)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tile_center_is_offset_by_half_a_tile() {
        assert_eq!(
            TilePosition::new(2, 2).center(64.0),
            Vec2::new(160.0, 160.0)
        );
    }

    #[test]
    fn containing_tile_floors_pixel_coordinates() {
        assert_eq!(
            TilePosition::containing(Vec2::new(191.9, 128.0), 64.0),
            Some(TilePosition::new(2, 2))
        );
        assert_eq!(TilePosition::containing(Vec2::new(-1.0, 5.0), 64.0), None);
        assert_eq!(TilePosition::containing(Vec2::new(1.0, 5.0), 0.0), None);
    }

    #[test]
    fn archetype_stats_match_presets() {
        let stats: Vec<_> = EnemyArchetype::ALL
            .iter()
            .map(|archetype| {
                (
                    archetype.max_health(),
                    archetype.speed(),
                    archetype.reward(),
                )
            })
            .collect();
        assert_eq!(stats, vec![(50, 3.0, 10), (200, 1.0, 30), (20, 2.0, 5)]);
    }

    #[test]
    fn walk_direction_follows_dominant_axis() {
        assert_eq!(
            WalkDirection::from_motion(Vec2::new(5.0, 1.0)),
            WalkDirection::Right
        );
        assert_eq!(
            WalkDirection::from_motion(Vec2::new(-5.0, 1.0)),
            WalkDirection::Left
        );
        assert_eq!(
            WalkDirection::from_motion(Vec2::new(1.0, 5.0)),
            WalkDirection::Down
        );
        assert_eq!(
            WalkDirection::from_motion(Vec2::new(1.0, -5.0)),
            WalkDirection::Up
        );
    }

    #[test]
    fn walk_direction_prefers_vertical_on_ties() {
        assert_eq!(
            WalkDirection::from_motion(Vec2::new(3.0, 3.0)),
            WalkDirection::Down
        );
        assert_eq!(WalkDirection::from_motion(Vec2::ZERO), WalkDirection::Up);
    }

    #[test]
    fn fixed_step_clock_does_not_drift() {
        let mut clock = FixedStepClock::new(60);
        let stamps: Vec<u64> = (0..3).map(|_| clock.tick().as_millis()).collect();
        assert_eq!(stamps, vec![16, 33, 50]);

        for _ in 3..60 {
            let _ = clock.tick();
        }
        assert_eq!(clock.now(), Timestamp::from_millis(1_000));
    }

    #[test]
    fn fixed_step_clock_rejects_zero_rate() {
        let mut clock = FixedStepClock::new(0);
        assert_eq!(clock.tick(), Timestamp::from_millis(1_000));
    }

    #[test]
    fn millis_since_saturates() {
        let earlier = Timestamp::from_millis(40);
        let later = Timestamp::from_millis(100);
        assert_eq!(later.millis_since(earlier), 60);
        assert_eq!(earlier.millis_since(later), 0);
    }

    #[test]
    fn basic_tower_stats_are_fixed() {
        let kind = TowerKind::Basic;
        assert!((kind.range() - 150.0).abs() < f32::EPSILON);
        assert_eq!(kind.cooldown_ms(), 1_500);
        assert_eq!(kind.attack_frames(), 6);
        assert_eq!(kind.max_level(), 2);
    }

    #[test]
    fn contracts_round_trip_through_bincode() {
        assert_round_trip(&TowerId::new(42));
        assert_round_trip(&EnemyId::new(7));
        assert_round_trip(&TilePosition::new(3, 9));
        assert_round_trip(&EnemyArchetype::Tank);
        assert_round_trip(&PlacementError::Occupied);
        assert_round_trip(&Timestamp::from_millis(1_234));
        assert_round_trip(&EnemyState {
            position: Vec2::new(12.5, -3.0),
            target_index: 2,
            health: 140,
        });
    }
}
