#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Path Defence adapters.

mod sprites;

use anyhow::Result as AnyResult;
use glam::Vec2;
use path_defence_core::{EnemyId, EnemyView, TowerId, TowerView};
use std::{error::Error, fmt, time::Duration};

pub use sprites::{
    enemy_walk_frame, tower_base_frame, weapon_offset, weapon_rotation_degrees, SpriteRect,
    WeaponSheet, ENEMY_FRAME_SIZE, ENEMY_WALK_FRAMES, TOWER_BASE_FRAMES, TOWER_BASE_HEIGHT,
    TOWER_BASE_WIDTH, WEAPON_FRAME_COUNT, WEAPON_OFFSETS,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Translucent white disc drawn around the selected tower.
pub const RANGE_INDICATOR_COLOR: Color = Color::new(1.0, 1.0, 1.0, 100.0 / 255.0);

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in screen pixels.
    pub cursor: Vec2,
    /// Whether the primary button is held down.
    pub pressed: bool,
    /// Whether the primary button went down during this frame.
    pub clicked: bool,
}

/// Enemy sprite placement for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyVisual {
    /// Enemy drawn by this sprite.
    pub id: EnemyId,
    /// Sprite center in pixels.
    pub center: Vec2,
    /// Walk-sheet source rectangle.
    pub frame: SpriteRect,
    /// Heading in degrees.
    pub facing_degrees: f32,
}

/// Circle drawn around a selected tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeIndicator {
    /// Circle center in pixels.
    pub center: Vec2,
    /// Circle radius in pixels.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Tower sprite placement for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerVisual {
    /// Tower drawn by this sprite.
    pub id: TowerId,
    /// Base sprite center in pixels.
    pub center: Vec2,
    /// Base-sheet source rectangle chosen by level.
    pub base: SpriteRect,
    /// Weapon-sheet source rectangle of the current attack frame.
    pub weapon: SpriteRect,
    /// Weapon sprite center in pixels.
    pub weapon_center: Vec2,
    /// Rotation applied to the weapon sprite in degrees.
    pub weapon_rotation_degrees: f32,
    /// Range circle, present only while the tower is selected.
    pub range_indicator: Option<RangeIndicator>,
}

/// Shop button drawn in the side panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelButton {
    /// Text or sprite name identifying the button.
    pub label: String,
    /// Top-left corner in pixels.
    pub origin: Vec2,
    /// Width and height in pixels.
    pub size: Vec2,
}

impl PanelButton {
    /// Creates a new panel button descriptor.
    #[must_use]
    pub fn new<T>(label: T, origin: Vec2, size: Vec2) -> Self
    where
        T: Into<String>,
    {
        Self {
            label: label.into(),
            origin,
            size,
        }
    }
}

/// Scene description combining the map, its inhabitants and the shop panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Size of the play area in pixels.
    pub play_area: Vec2,
    /// Enemies in spawn order.
    pub enemies: Vec<EnemyVisual>,
    /// Towers in placement order.
    pub towers: Vec<TowerVisual>,
    /// Buttons drawn in the shop panel.
    pub buttons: Vec<PanelButton>,
    /// Tower ghost following the cursor while placing.
    pub placement_cursor: Option<Vec2>,
}

impl Scene {
    /// Derives sprite placements from world views.
    #[must_use]
    pub fn from_views(
        play_area: Vec2,
        enemies: &EnemyView,
        towers: &TowerView,
        weapon_sheet: &WeaponSheet,
    ) -> Self {
        let enemies = enemies
            .iter()
            .map(|enemy| EnemyVisual {
                id: enemy.id,
                center: enemy.position,
                frame: enemy_walk_frame(enemy.direction, enemy.frame),
                facing_degrees: enemy.facing_degrees,
            })
            .collect();
        let towers = towers
            .iter()
            .map(|tower| TowerVisual {
                id: tower.id,
                center: tower.center,
                base: tower_base_frame(tower.level),
                weapon: weapon_sheet.frame(tower.attack_frame),
                weapon_center: tower.center + weapon_offset(tower.level),
                weapon_rotation_degrees: weapon_rotation_degrees(tower.angle_degrees),
                range_indicator: tower.selected.then_some(RangeIndicator {
                    center: tower.center,
                    radius: tower.range,
                    color: RANGE_INDICATOR_COLOR,
                }),
            })
            .collect();

        Self {
            play_area,
            enemies,
            towers,
            buttons: Vec::new(),
            placement_cursor: None,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Path Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn. Returning `false` asks the backend to stop.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Weapon sheets must be at least one pixel tall.
    EmptyWeaponSheet,
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWeaponSheet => write!(f, "weapon sheet height must be positive"),
        }
    }
}

impl Error for RenderingError {}
