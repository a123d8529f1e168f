#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks the enemy a tower should attack.
//!
//! Selection scans candidates in the order supplied by the caller and keeps
//! overwriting its choice with every candidate strictly inside the range, so
//! the **last** in-range candidate wins rather than the nearest one. The world
//! supplies enemies in spawn order, which makes the choice deterministic.

use glam::Vec2;
use path_defence_core::{distance, heading_degrees, EnemyId};

/// Enemy position offered to the selection scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    /// Identifier of the enemy.
    pub enemy: EnemyId,
    /// Enemy position in pixels.
    pub position: Vec2,
}

impl TargetCandidate {
    /// Creates a new candidate descriptor.
    #[must_use]
    pub const fn new(enemy: EnemyId, position: Vec2) -> Self {
        Self { enemy, position }
    }
}

/// Outcome of a successful selection scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetLock {
    /// Enemy the tower should attack.
    pub enemy: EnemyId,
    /// Distance from the tower to the enemy in pixels.
    pub distance: f32,
    /// Weapon angle toward the enemy in degrees.
    pub angle_degrees: f32,
}

/// Reports whether `position` lies strictly inside the circle around `origin`.
#[must_use]
pub fn in_range(origin: Vec2, range: f32, position: Vec2) -> bool {
    distance(origin, position) < range
}

/// Selects the last candidate strictly within `range` of `origin`.
///
/// Returns `None` when no candidate is in range, which callers treat as an
/// idle tower rather than an error.
pub fn select_target<I>(origin: Vec2, range: f32, candidates: I) -> Option<TargetLock>
where
    I: IntoIterator<Item = TargetCandidate>,
{
    let mut lock = None;
    for candidate in candidates {
        let separation = distance(origin, candidate.position);
        if separation < range {
            lock = Some(TargetLock {
                enemy: candidate.enemy,
                distance: separation,
                angle_degrees: heading_degrees(candidate.position - origin),
            });
        }
    }
    lock
}
