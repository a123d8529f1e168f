//! Tile map consulted when validating tower placement.

use path_defence_core::{TileId, TilePosition, GRASS_TILE};

/// Row-major grid of tile identifiers produced by the level loader.
#[derive(Clone, Debug)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tile_size: f32,
    tiles: Vec<TileId>,
}

impl TileMap {
    /// Creates a tile map from row-major identifiers.
    ///
    /// Missing trailing entries behave like non-buildable tiles; surplus
    /// entries are never consulted.
    #[must_use]
    pub(crate) fn new(columns: u32, rows: u32, tile_size: f32, tiles: Vec<TileId>) -> Self {
        Self {
            columns,
            rows,
            tile_size,
            tiles,
        }
    }

    /// Map without any tiles, used before a level is configured.
    #[must_use]
    pub(crate) fn empty(tile_size: f32) -> Self {
        Self::new(0, 0, tile_size, Vec::new())
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub const fn contains(&self, tile: TilePosition) -> bool {
        tile.column() < self.columns && tile.row() < self.rows
    }

    /// Identifier stored for the tile, if the tile is inside the grid.
    #[must_use]
    pub fn tile_id(&self, tile: TilePosition) -> Option<TileId> {
        if !self.contains(tile) {
            return None;
        }
        let index = tile.row() as usize * self.columns as usize + tile.column() as usize;
        self.tiles.get(index).copied()
    }

    /// Reports whether towers may be built on the tile.
    #[must_use]
    pub fn is_buildable(&self, tile: TilePosition) -> bool {
        self.tile_id(tile) == Some(GRASS_TILE)
    }
}
