//! Sprite-sheet frame tables for enemies and towers.
//!
//! Every lookup goes through an explicit table so sheet layouts can be read
//! off the constants below rather than reconstructed from index arithmetic at
//! call sites.

use glam::Vec2;
use path_defence_core::{TowerKind, WalkDirection, WALK_FRAME_COUNT};

use crate::RenderingError;

/// Side length of a square enemy walk frame in pixels.
pub const ENEMY_FRAME_SIZE: u32 = 72;
/// Width of one tower base column in pixels.
pub const TOWER_BASE_WIDTH: u32 = 64;
/// Height of the tower base sheet in pixels.
pub const TOWER_BASE_HEIGHT: u32 = 128;
/// Number of frames on a weapon sheet.
pub const WEAPON_FRAME_COUNT: usize = 6;

/// Source rectangle on a sprite sheet, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl SpriteRect {
    /// Creates a new source rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

const fn walk_row(row: u32) -> [SpriteRect; WALK_FRAME_COUNT] {
    let y = row * ENEMY_FRAME_SIZE;
    [
        SpriteRect::new(0, y, ENEMY_FRAME_SIZE, ENEMY_FRAME_SIZE),
        SpriteRect::new(ENEMY_FRAME_SIZE, y, ENEMY_FRAME_SIZE, ENEMY_FRAME_SIZE),
        SpriteRect::new(2 * ENEMY_FRAME_SIZE, y, ENEMY_FRAME_SIZE, ENEMY_FRAME_SIZE),
        SpriteRect::new(3 * ENEMY_FRAME_SIZE, y, ENEMY_FRAME_SIZE, ENEMY_FRAME_SIZE),
    ]
}

/// Walk-cycle frames, one row per direction: down, left, right, up.
pub const ENEMY_WALK_FRAMES: [[SpriteRect; WALK_FRAME_COUNT]; 4] =
    [walk_row(0), walk_row(1), walk_row(2), walk_row(3)];

/// Tower base frames indexed by tower level.
pub const TOWER_BASE_FRAMES: [SpriteRect; 3] = [
    SpriteRect::new(0, 0, TOWER_BASE_WIDTH, TOWER_BASE_HEIGHT),
    SpriteRect::new(TOWER_BASE_WIDTH, 0, TOWER_BASE_WIDTH, TOWER_BASE_HEIGHT),
    SpriteRect::new(2 * TOWER_BASE_WIDTH, 0, TOWER_BASE_WIDTH, TOWER_BASE_HEIGHT),
];

/// Weapon offsets from the tower center indexed by tower level.
pub const WEAPON_OFFSETS: [Vec2; 3] = [
    Vec2::new(0.0, -10.0),
    Vec2::new(0.0, -15.0),
    Vec2::new(0.0, -20.0),
];

const fn walk_row_index(direction: WalkDirection) -> usize {
    match direction {
        WalkDirection::Down => 0,
        WalkDirection::Left => 1,
        WalkDirection::Right => 2,
        WalkDirection::Up => 3,
    }
}

/// Source rectangle for an enemy walking in `direction` at walk-cycle `frame`.
///
/// Frames wrap around the walk cycle.
#[must_use]
pub const fn enemy_walk_frame(direction: WalkDirection, frame: usize) -> SpriteRect {
    ENEMY_WALK_FRAMES[walk_row_index(direction)][frame % WALK_FRAME_COUNT]
}

/// Source rectangle of the tower base for the given level.
///
/// Levels beyond the sheet reuse the last column.
#[must_use]
pub fn tower_base_frame(level: u8) -> SpriteRect {
    let index = usize::from(level).min(TOWER_BASE_FRAMES.len() - 1);
    TOWER_BASE_FRAMES[index]
}

/// Weapon offset from the tower center for the given level.
#[must_use]
pub fn weapon_offset(level: u8) -> Vec2 {
    WEAPON_OFFSETS
        .get(usize::from(level))
        .copied()
        .unwrap_or(Vec2::ZERO)
}

/// Rotation applied to the weapon sprite, which is drawn pointing up.
#[must_use]
pub fn weapon_rotation_degrees(angle_degrees: f32) -> f32 {
    angle_degrees - 90.0
}

/// Square weapon frames laid out left to right on a sheet of the given height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaponSheet {
    frames: [SpriteRect; WEAPON_FRAME_COUNT],
}

impl WeaponSheet {
    /// Slices a weapon sheet whose frames are as wide as the sheet is tall.
    pub fn new(sheet_height: u32) -> Result<Self, RenderingError> {
        if sheet_height == 0 {
            return Err(RenderingError::EmptyWeaponSheet);
        }
        let frame =
            |index: u32| SpriteRect::new(index * sheet_height, 0, sheet_height, sheet_height);
        Ok(Self {
            frames: [frame(0), frame(1), frame(2), frame(3), frame(4), frame(5)],
        })
    }

    /// Weapon sheet used by the given tower kind.
    pub fn for_kind(kind: TowerKind) -> Result<Self, RenderingError> {
        match kind {
            TowerKind::Basic => Self::new(96),
        }
    }

    /// Source rectangle of an attack animation frame.
    ///
    /// Frames wrap around the sheet.
    #[must_use]
    pub fn frame(&self, index: usize) -> SpriteRect {
        self.frames[index % WEAPON_FRAME_COUNT]
    }
}
