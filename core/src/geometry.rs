//! Planar vector helpers shared by enemy motion and tower aiming.

use glam::Vec2;

/// Result of moving a point toward a destination by a fixed distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The destination was closer than the step length and the point snapped onto it.
    Arrived(Vec2),
    /// The point travelled the full step length along the direction of travel.
    Moved(Vec2),
}

impl Step {
    /// Position reached after applying the step.
    #[must_use]
    pub const fn position(self) -> Vec2 {
        match self {
            Self::Arrived(position) | Self::Moved(position) => position,
        }
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(from: Vec2, to: Vec2) -> f32 {
    (to - from).length()
}

/// Unit vector pointing from `from` toward `to`.
///
/// Returns `None` when both points coincide, since no direction exists.
#[must_use]
pub fn direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON {
        return None;
    }
    Some(delta / length)
}

/// Screen-space heading of a vector in degrees.
///
/// Screen coordinates grow downward, so the vertical component is negated
/// to obtain the conventional counter-clockwise angle: `(1, 0)` maps to 0°,
/// `(0, -1)` to 90° and `(0, 1)` to -90°.
#[must_use]
pub fn heading_degrees(delta: Vec2) -> f32 {
    (-delta.y).atan2(delta.x).to_degrees()
}

/// Moves `position` toward `destination` by at most `speed` units.
///
/// When the remaining distance is shorter than `speed`, or the points already
/// coincide, the position snaps onto the destination instead of overshooting.
#[must_use]
pub fn step_toward(position: Vec2, destination: Vec2, speed: f32) -> Step {
    if distance(position, destination) < speed {
        return Step::Arrived(destination);
    }
    match direction(position, destination) {
        Some(unit) => Step::Moved(position + unit * speed),
        None => Step::Arrived(destination),
    }
}
