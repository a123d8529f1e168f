//! Optional TOML settings describing the grid and the enemy wave.

use std::{fs, io, path::Path, time::Duration};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

/// Failures raised while reading a settings file.
#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    /// The file could not be read.
    #[error("failed to read settings file {path}")]
    Read {
        /// Location that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid settings TOML.
    #[error("failed to parse settings")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but cannot drive a simulation.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// Human readable constraint.
        reason: &'static str,
    },
}

/// Offset added to every waypoint read from a level file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct WaypointOffset {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl WaypointOffset {
    pub(crate) fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Tunables read from the settings file, with built-in defaults for every key.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) tile_size: f32,
    pub(crate) fps: u32,
    pub(crate) waypoint_offset: WaypointOffset,
    pub(crate) spawn_interval_ms: u64,
    pub(crate) seed: u64,
    pub(crate) spawn_limit: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: 15,
            rows: 15,
            tile_size: 64.0,
            fps: 60,
            waypoint_offset: WaypointOffset::default(),
            spawn_interval_ms: 2_000,
            seed: 0x5eed,
            spawn_limit: Some(20),
        }
    }
}

impl Settings {
    /// Reads and validates the settings file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses settings from TOML text, filling omitted keys with defaults.
    pub(crate) fn parse(contents: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(SettingsError::Invalid {
                field: "columns",
                reason: "the grid needs at least one tile",
            });
        }
        if self.tile_size.is_nan() || self.tile_size <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "tile_size",
                reason: "must be positive",
            });
        }
        if self.fps == 0 {
            return Err(SettingsError::Invalid {
                field: "fps",
                reason: "must be positive",
            });
        }
        if self.spawn_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "spawn_interval_ms",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    pub(crate) fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }
}
