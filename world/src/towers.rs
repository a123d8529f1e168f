//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use glam::Vec2;
use path_defence_core::{
    EnemyId, Event, TilePosition, Timestamp, TowerId, TowerKind, TowerSnapshot, UpgradeError,
};
use path_defence_system_tower_targeting::{select_target, TargetCandidate, TargetLock};
use tracing::trace;

use crate::enemies::{DamageOutcome, EnemyRegistry};

/// Tower standing on a grass tile, aiming at and attacking enemies.
#[derive(Clone, Debug)]
pub struct Tower {
    id: TowerId,
    kind: TowerKind,
    tile: TilePosition,
    center: Vec2,
    level: u8,
    selected: bool,
    angle_degrees: f32,
    target: Option<EnemyId>,
    attack_frame: usize,
    last_frame_at: Timestamp,
    last_fired: Timestamp,
}

impl Tower {
    /// Constructs a tower on a tile that placement already validated.
    ///
    /// Both the cooldown and the attack animation count from `now`, so a fresh
    /// tower waits one full cooldown before it looks for a target.
    #[must_use]
    pub fn construct(
        id: TowerId,
        kind: TowerKind,
        tile: TilePosition,
        tile_size: f32,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            kind,
            tile,
            center: tile.center(tile_size),
            level: 0,
            selected: false,
            angle_degrees: kind.initial_angle(),
            target: None,
            attack_frame: 0,
            last_frame_at: now,
            last_fired: now,
        }
    }

    /// Runs one tick against the live enemies.
    ///
    /// A target that died or left the map is dropped first. A tower holding a
    /// target advances its attack animation and damages the target when the
    /// animation completes; an idle tower searches for a target once its
    /// cooldown elapsed.
    pub(crate) fn tick(
        &mut self,
        enemies: &mut EnemyRegistry,
        now: Timestamp,
        out_events: &mut Vec<Event>,
    ) {
        if let Some(enemy) = self.target {
            let still_valid = enemies
                .get(enemy)
                .is_some_and(|candidate| candidate.is_targetable());
            if !still_valid {
                self.target = None;
                self.attack_frame = 0;
                out_events.push(Event::TowerTargetLost {
                    tower: self.id,
                    enemy,
                });
            }
        }

        match self.target {
            Some(enemy) => self.play_attack(enemy, enemies, now, out_events),
            None => {
                if now.millis_since(self.last_fired) > self.kind.cooldown_ms() {
                    if let Some(lock) = self.select_target(enemies) {
                        trace!(
                            tower = self.id.get(),
                            enemy = lock.enemy.get(),
                            angle = lock.angle_degrees,
                            "target acquired"
                        );
                        out_events.push(Event::TowerTargetAcquired {
                            tower: self.id,
                            enemy: lock.enemy,
                            angle_degrees: lock.angle_degrees,
                        });
                    }
                }
            }
        }
    }

    /// Locks onto the last targetable enemy in range, turning the weapon toward it.
    ///
    /// Leaves the tower untouched when no enemy is in range.
    pub(crate) fn select_target(&mut self, enemies: &EnemyRegistry) -> Option<TargetLock> {
        let candidates = enemies
            .iter()
            .filter(|enemy| enemy.is_targetable())
            .map(|enemy| TargetCandidate::new(enemy.id(), enemy.position()));
        let lock = select_target(self.center, self.kind.range(), candidates)?;
        self.target = Some(lock.enemy);
        self.angle_degrees = lock.angle_degrees;
        Some(lock)
    }

    fn play_attack(
        &mut self,
        enemy: EnemyId,
        enemies: &mut EnemyRegistry,
        now: Timestamp,
        out_events: &mut Vec<Event>,
    ) {
        if now.millis_since(self.last_frame_at) <= self.kind.attack_frame_ms() {
            return;
        }
        self.last_frame_at = now;
        self.attack_frame += 1;
        if self.attack_frame < self.kind.attack_frames() {
            return;
        }

        self.attack_frame = 0;
        self.last_fired = now;
        self.target = None;
        out_events.push(Event::TowerFired {
            tower: self.id,
            enemy,
        });

        let Some(victim) = enemies.get_mut(enemy) else {
            return;
        };
        match victim.take_damage(self.kind.damage()) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded { remaining_health } => {
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    remaining_health,
                });
            }
            DamageOutcome::Killed { reward } => {
                out_events.push(Event::EnemyKilled {
                    enemy,
                    archetype: victim.archetype(),
                    reward,
                });
            }
        }
    }

    /// Raises the tower level by one.
    ///
    /// Levels only change the tower's appearance.
    pub fn upgrade(&mut self) -> Result<u8, UpgradeError> {
        if self.level >= self.kind.max_level() {
            return Err(UpgradeError::MaxLevel);
        }
        self.level += 1;
        Ok(self.level)
    }

    /// Identifier allocated by the registry.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Tile occupied by the tower.
    #[must_use]
    pub const fn tile(&self) -> TilePosition {
        self.tile
    }

    /// Pixel center of the tower.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Visual level in `0..=max_level`.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Enemy currently under attack.
    #[must_use]
    pub const fn target(&self) -> Option<EnemyId> {
        self.target
    }

    /// Weapon angle in degrees.
    #[must_use]
    pub const fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    /// Time the last attack animation completed.
    #[must_use]
    pub const fn last_fired(&self) -> Timestamp {
        self.last_fired
    }

    /// Whether the player selected this tower.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
            center: self.center,
            level: self.level,
            selected: self.selected,
            range: self.kind.range(),
            angle_degrees: self.angle_degrees,
            target: self.target,
            attack_frame: self.attack_frame,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = TowerId::new(0);
    }

    /// Constructs a tower on a validated tile and stores it.
    pub(crate) fn place(
        &mut self,
        kind: TowerKind,
        tile: TilePosition,
        tile_size: f32,
        now: Timestamp,
    ) -> &Tower {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        self.entries
            .entry(id)
            .or_insert_with(|| Tower::construct(id, kind, tile, tile_size, now))
    }

    pub(crate) fn is_occupied(&self, tile: TilePosition) -> bool {
        self.tower_at(tile).is_some()
    }

    pub(crate) fn tower_at(&self, tile: TilePosition) -> Option<&Tower> {
        self.entries.values().find(|tower| tower.tile == tile)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    /// Deselects every tower, reporting whether any tower was selected.
    pub(crate) fn clear_selection(&mut self) -> bool {
        let mut cleared = false;
        for tower in self.entries.values_mut() {
            cleared |= tower.selected;
            tower.selected = false;
        }
        cleared
    }
}
