//! Tiled JSON level loading.
//!
//! Only two layers are read: the tile layer named `Tile Layer 1` and the
//! object layer named `Waypoints`. Every polyline point is made absolute by
//! adding its object's origin and the configured waypoint offset.

use std::{fs, io, path::Path as FsPath};

use glam::Vec2;
use path_defence_core::{Command, Path, PathError, TileId};
use serde::Deserialize;
use thiserror::Error;

use crate::settings::Settings;

/// Name of the layer holding row-major tile identifiers.
const TILE_LAYER: &str = "Tile Layer 1";
/// Name of the object layer holding the enemy path.
const WAYPOINT_LAYER: &str = "Waypoints";

/// Level shipped with the binary and used when no `--level` is given.
pub(crate) const DEFAULT_LEVEL: &str = include_str!("../assets/default_level.tmj");

/// Failures raised while loading a level.
#[derive(Debug, Error)]
pub(crate) enum LevelError {
    /// The file could not be read.
    #[error("failed to read level file {path}")]
    Read {
        /// Location that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not Tiled JSON.
    #[error("failed to parse level json")]
    Parse(#[from] serde_json::Error),
    /// A required layer is absent.
    #[error("level has no layer named `{0}`")]
    MissingLayer(&'static str),
    /// The tile layer does not cover the configured grid.
    #[error("tile layer holds {actual} tiles but the grid needs {expected}")]
    TileCount {
        /// `columns * rows` from the settings.
        expected: usize,
        /// Number of entries in the tile layer.
        actual: usize,
    },
    /// The waypoint layer holds no points.
    #[error("waypoint layer has no polyline points")]
    EmptyPath(#[from] PathError),
}

#[derive(Debug, Deserialize)]
struct TiledMap {
    layers: Vec<TiledLayer>,
}

#[derive(Debug, Deserialize)]
struct TiledLayer {
    name: String,
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    objects: Vec<TiledObject>,
}

#[derive(Debug, Deserialize)]
struct TiledObject {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    polyline: Vec<TiledPoint>,
}

#[derive(Debug, Deserialize)]
struct TiledPoint {
    x: f32,
    y: f32,
}

/// Map and path ready to be handed to the world.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Level {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) tile_size: f32,
    pub(crate) tiles: Vec<TileId>,
    pub(crate) path: Path,
}

impl Level {
    /// Reads the level at `path`, or the embedded default when `None`.
    pub(crate) fn load(path: Option<&FsPath>, settings: &Settings) -> Result<Self, LevelError> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| LevelError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::parse(&contents, settings)
            }
            None => Self::parse(DEFAULT_LEVEL, settings),
        }
    }

    /// Parses Tiled JSON against the grid described by `settings`.
    pub(crate) fn parse(contents: &str, settings: &Settings) -> Result<Self, LevelError> {
        let map: TiledMap = serde_json::from_str(contents)?;

        let tile_layer = map
            .layers
            .iter()
            .find(|layer| layer.name == TILE_LAYER)
            .ok_or(LevelError::MissingLayer(TILE_LAYER))?;
        let expected = settings.columns as usize * settings.rows as usize;
        if tile_layer.data.len() != expected {
            return Err(LevelError::TileCount {
                expected,
                actual: tile_layer.data.len(),
            });
        }
        let tiles = tile_layer.data.iter().copied().map(TileId::new).collect();

        let waypoint_layer = map
            .layers
            .iter()
            .find(|layer| layer.name == WAYPOINT_LAYER)
            .ok_or(LevelError::MissingLayer(WAYPOINT_LAYER))?;
        let offset = settings.waypoint_offset.as_vec2();
        let waypoints = waypoint_layer
            .objects
            .iter()
            .flat_map(|object| {
                let origin = Vec2::new(object.x, object.y);
                object
                    .polyline
                    .iter()
                    .map(move |point| origin + Vec2::new(point.x, point.y) + offset)
            })
            .collect();

        Ok(Self {
            columns: settings.columns,
            rows: settings.rows,
            tile_size: settings.tile_size,
            tiles,
            path: Path::new(waypoints)?,
        })
    }

    /// Command loading this level into a world.
    pub(crate) fn configure_command(&self) -> Command {
        Command::ConfigureLevel {
            columns: self.columns,
            rows: self.rows,
            tile_size: self.tile_size,
            tiles: self.tiles.clone(),
            path: self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::WaypointOffset;
    use path_defence_core::GRASS_TILE;

    fn small_settings() -> Settings {
        Settings {
            columns: 2,
            rows: 2,
            ..Settings::default()
        }
    }

    const SMALL_LEVEL: &str = r#"{
        "layers": [
            { "name": "Tile Layer 1", "data": [119, 119, 25, 25] },
            { "name": "Waypoints", "objects": [
                { "x": 10, "y": 96, "polyline": [ { "x": 0, "y": 0 }, { "x": 100, "y": -64 } ] }
            ] }
        ]
    }"#;

    #[test]
    fn embedded_level_matches_default_grid() {
        let level = Level::load(None, &Settings::default()).expect("default level parses");

        assert_eq!(level.tiles.len(), 225);
        assert_eq!(level.path.spawn_point(), Vec2::new(0.0, 480.0));
        assert_eq!(level.path.end_point(), Vec2::new(960.0, 224.0));
        assert_eq!(level.path.len(), 6);
        assert_eq!(level.tiles[0], GRASS_TILE);
        assert_ne!(level.tiles[7 * 15], GRASS_TILE, "the path starts on a road");
    }

    #[test]
    fn polyline_points_are_relative_to_object_origin() {
        let level = Level::parse(SMALL_LEVEL, &small_settings()).expect("valid level");
        assert_eq!(
            level.path.waypoints(),
            &[Vec2::new(10.0, 96.0), Vec2::new(110.0, 32.0)]
        );
        assert_eq!(level.tiles[2], TileId::new(25));
    }

    #[test]
    fn waypoint_offset_shifts_every_point() {
        let settings = Settings {
            waypoint_offset: WaypointOffset { x: 5.0, y: -1.0 },
            ..small_settings()
        };
        let level = Level::parse(SMALL_LEVEL, &settings).expect("valid level");
        assert_eq!(level.path.spawn_point(), Vec2::new(15.0, 95.0));
    }

    #[test]
    fn tile_count_must_match_grid() {
        let result = Level::parse(SMALL_LEVEL, &Settings::default());
        assert!(matches!(
            result,
            Err(LevelError::TileCount {
                expected: 225,
                actual: 4
            })
        ));
    }

    #[test]
    fn missing_waypoint_layer_is_reported() {
        let contents = r#"{ "layers": [ { "name": "Tile Layer 1", "data": [1, 2, 3, 4] } ] }"#;
        assert!(matches!(
            Level::parse(contents, &small_settings()),
            Err(LevelError::MissingLayer(WAYPOINT_LAYER))
        ));
    }

    #[test]
    fn empty_polyline_is_reported() {
        let contents = r#"{ "layers": [
            { "name": "Tile Layer 1", "data": [1, 2, 3, 4] },
            { "name": "Waypoints", "objects": [ { "x": 0, "y": 0, "polyline": [] } ] }
        ] }"#;
        assert!(matches!(
            Level::parse(contents, &small_settings()),
            Err(LevelError::EmptyPath(PathError::Empty))
        ));
    }

    #[test]
    fn configure_command_carries_the_grid() {
        let level = Level::parse(SMALL_LEVEL, &small_settings()).expect("valid level");
        assert!(matches!(
            level.configure_command(),
            Command::ConfigureLevel { columns: 2, rows: 2, ref tiles, .. } if tiles.len() == 4
        ));
    }
}
