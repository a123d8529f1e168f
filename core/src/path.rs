//! Immutable waypoint sequences walked by enemies.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a waypoint sequence cannot form a [`Path`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A path needs at least the spawn point.
    #[error("a path requires at least one waypoint")]
    Empty,
}

/// Ordered waypoints an enemy visits in sequence.
///
/// Index 0 is the spawn point. The sequence is never empty and never changes
/// after construction, so a single path is shared read-only by every enemy
/// spawned on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Path {
    waypoints: Vec<Vec2>,
}

impl Path {
    /// Creates a path from the provided waypoints.
    pub fn new(waypoints: Vec<Vec2>) -> Result<Self, PathError> {
        if waypoints.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self { waypoints })
    }

    /// Creates a path from raw `(x, y)` pairs as produced by level parsers.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        Self::new(pairs.into_iter().map(|(x, y)| Vec2::new(x, y)).collect())
    }

    /// Number of waypoints, always at least one.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Waypoint stored at the provided index, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// First waypoint, where enemies appear.
    #[must_use]
    pub fn spawn_point(&self) -> Vec2 {
        self.waypoints[0]
    }

    /// Final waypoint; reaching it and moving on counts as a leak.
    #[must_use]
    pub fn end_point(&self) -> Vec2 {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// All waypoints in traversal order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }
}

impl TryFrom<Vec<Vec2>> for Path {
    type Error = PathError;

    fn try_from(waypoints: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(waypoints)
    }
}

impl From<Path> for Vec<Vec2> {
    fn from(path: Path) -> Self {
        path.waypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_waypoints_are_rejected() {
        assert_eq!(Path::new(Vec::new()), Err(PathError::Empty));
        assert_eq!(Path::from_pairs(std::iter::empty()), Err(PathError::Empty));
    }

    #[test]
    fn single_waypoint_is_both_spawn_and_end() {
        let path = Path::from_pairs([(4.0, 2.0)]).expect("one waypoint is enough");
        assert_eq!(path.len(), 1);
        assert_eq!(path.spawn_point(), path.end_point());
        assert!(path.get(1).is_none());
    }

    #[test]
    fn deserialising_an_empty_path_fails() {
        let bytes = bincode::serialize(&Vec::<Vec2>::new()).expect("serialize");
        assert!(bincode::deserialize::<Path>(&bytes).is_err());
    }

    #[test]
    fn path_round_trips_through_bincode() {
        let path = Path::from_pairs([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]).expect("valid");
        let bytes = bincode::serialize(&path).expect("serialize");
        let restored: Path = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, path);
    }
}
