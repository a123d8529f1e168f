//! Enemy entity and the registry that owns live enemies.

use std::sync::Arc;

use glam::Vec2;
use path_defence_core::{
    heading_degrees, step_toward, EnemyArchetype, EnemyId, EnemySnapshot, EnemyState, EnemyStats,
    Path, Step, WalkDirection, WALK_FRAME_COUNT,
};

/// Amount added to the walk-cycle accumulator every tick.
///
/// Accumulated in `f64`, where ten steps sum to just under one, so a frame
/// lasts eleven ticks.
const ANIMATION_SPEED: f64 = 0.1;

/// Result of advancing an enemy for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionOutcome {
    /// The enemy moved toward its current waypoint without reaching it.
    Moving,
    /// The enemy snapped onto a waypoint and now heads for the next one.
    ReachedWaypoint {
        /// Index of the waypoint that was reached.
        waypoint: usize,
    },
    /// The enemy had already passed the last waypoint and leaves the map.
    ReachedEnd,
}

/// Result of applying damage to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The hit was not applied: the amount was not positive or the enemy was already dead.
    Ignored,
    /// The enemy survived with the reported health.
    Wounded {
        /// Health left after the hit.
        remaining_health: i32,
    },
    /// The hit killed the enemy. Reported exactly once per enemy.
    Killed {
        /// Resources awarded for the kill.
        reward: u32,
    },
}

/// Enemy walking a shared waypoint path.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    archetype: EnemyArchetype,
    stats: EnemyStats,
    path: Arc<Path>,
    position: Vec2,
    target_index: usize,
    health: i32,
    alive: bool,
    finished: bool,
    facing_degrees: f32,
    direction: WalkDirection,
    frame: usize,
    animation_timer: f64,
}

impl Enemy {
    /// Creates an enemy standing on the first waypoint of `path`.
    #[must_use]
    pub fn new(id: EnemyId, archetype: EnemyArchetype, path: Arc<Path>) -> Self {
        Self::with_stats(id, archetype, archetype.stats(), path)
    }

    /// Creates an enemy whose constants differ from its archetype's presets.
    #[must_use]
    pub fn with_stats(
        id: EnemyId,
        archetype: EnemyArchetype,
        stats: EnemyStats,
        path: Arc<Path>,
    ) -> Self {
        let state = EnemyState {
            position: path.spawn_point(),
            target_index: 1,
            health: stats.max_health,
        };
        Self::from_parts(id, archetype, stats, path, state)
    }

    /// Recreates an enemy from a previously captured [`EnemyState`].
    ///
    /// Derived sprite state starts fresh; motion is fully determined by the
    /// restored fields and the path.
    #[must_use]
    pub fn restore(
        id: EnemyId,
        archetype: EnemyArchetype,
        path: Arc<Path>,
        state: EnemyState,
    ) -> Self {
        Self::from_parts(id, archetype, archetype.stats(), path, state)
    }

    fn from_parts(
        id: EnemyId,
        archetype: EnemyArchetype,
        stats: EnemyStats,
        path: Arc<Path>,
        state: EnemyState,
    ) -> Self {
        Self {
            id,
            archetype,
            stats,
            path,
            position: state.position,
            target_index: state.target_index,
            health: state.health,
            alive: state.health > 0,
            finished: false,
            facing_degrees: 0.0,
            direction: WalkDirection::Down,
            frame: 0,
            animation_timer: 0.0,
        }
    }

    /// Captures the state needed to resume this enemy's motion.
    #[must_use]
    pub fn state(&self) -> EnemyState {
        EnemyState {
            position: self.position,
            target_index: self.target_index,
            health: self.health,
        }
    }

    /// Runs one tick: motion first, then facing and walk cycle from the new position.
    pub fn update(&mut self) -> MotionOutcome {
        let outcome = self.advance();
        if outcome != MotionOutcome::ReachedEnd {
            self.compute_facing();
            self.compute_animation();
        }
        outcome
    }

    /// Moves toward the current waypoint by the archetype's speed.
    pub fn advance(&mut self) -> MotionOutcome {
        let Some(waypoint) = self.path.get(self.target_index) else {
            self.finished = true;
            return MotionOutcome::ReachedEnd;
        };

        match step_toward(self.position, waypoint, self.stats.speed) {
            Step::Arrived(position) => {
                self.position = position;
                let reached = self.target_index;
                self.target_index += 1;
                MotionOutcome::ReachedWaypoint { waypoint: reached }
            }
            Step::Moved(position) => {
                self.position = position;
                MotionOutcome::Moving
            }
        }
    }

    /// Points the enemy at its current waypoint.
    ///
    /// Enemies past the end keep the previous angle.
    pub fn compute_facing(&mut self) {
        if let Some(delta) = self.vector_to_waypoint() {
            self.facing_degrees = heading_degrees(delta);
        }
    }

    /// Derives the walk direction and advances the walk cycle.
    pub fn compute_animation(&mut self) {
        let Some(delta) = self.vector_to_waypoint() else {
            return;
        };
        self.direction = WalkDirection::from_motion(delta);

        self.animation_timer += ANIMATION_SPEED;
        if self.animation_timer >= 1.0 {
            self.animation_timer = 0.0;
            self.frame = (self.frame + 1) % WALK_FRAME_COUNT;
        }
    }

    /// Subtracts `amount` from the enemy's health.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.alive || amount <= 0 {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health <= 0 {
            self.alive = false;
            return DamageOutcome::Killed {
                reward: self.stats.reward,
            };
        }

        DamageOutcome::Wounded {
            remaining_health: self.health,
        }
    }

    /// Identifier assigned by the registry.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Stats preset of the enemy.
    #[must_use]
    pub const fn archetype(&self) -> EnemyArchetype {
        self.archetype
    }

    /// Position in pixels.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Index of the waypoint the enemy walks toward.
    #[must_use]
    pub const fn target_index(&self) -> usize {
        self.target_index
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Whether the enemy still has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the enemy walked past the final waypoint.
    #[must_use]
    pub const fn has_finished(&self) -> bool {
        self.finished
    }

    /// Whether towers may still select this enemy.
    #[must_use]
    pub const fn is_targetable(&self) -> bool {
        self.alive && !self.finished
    }

    /// Heading toward the current waypoint in degrees.
    #[must_use]
    pub const fn facing_degrees(&self) -> f32 {
        self.facing_degrees
    }

    /// Current walk-cycle orientation.
    #[must_use]
    pub const fn direction(&self) -> WalkDirection {
        self.direction
    }

    /// Current walk-cycle frame.
    #[must_use]
    pub const fn frame(&self) -> usize {
        self.frame
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            archetype: self.archetype,
            position: self.position,
            target_index: self.target_index,
            health: self.health,
            facing_degrees: self.facing_degrees,
            direction: self.direction,
            frame: self.frame,
        }
    }

    fn vector_to_waypoint(&self) -> Option<Vec2> {
        self.path
            .get(self.target_index)
            .map(|waypoint| waypoint - self.position)
    }
}

/// Registry that stores live enemies in spawn order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct EnemyRegistry {
    entries: Vec<Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn spawn(&mut self, archetype: EnemyArchetype, path: Arc<Path>) -> &Enemy {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        self.entries.push(Enemy::new(id, archetype, path));
        &self.entries[self.entries.len() - 1]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.entries.iter_mut()
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.entries.iter().find(|enemy| enemy.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.entries.iter_mut().find(|enemy| enemy.id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes dead and finished enemies, returning them in spawn order.
    pub(crate) fn remove_pending(&mut self) -> Vec<Enemy> {
        let (removed, kept): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|enemy| !enemy.is_targetable());
        self.entries = kept;
        removed
    }
}
