use super::constants::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Type alias for tile IDs (u16 allows 0-65,535 unique tiles)
pub type TileId = u16;

/// A single tile stored in a chunk.
///
/// The id is opaque to the storage layer: tile properties are looked up by
/// callers elsewhere. Only [`Tile::AIR`] carries meaning here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
}

impl Tile {
    /// Unexplored/empty space
    pub const AIR: Tile = Tile { id: TILE_AIR };

    /// Returned by reads that land outside the map
    pub const ERROR: Tile = Tile { id: TILE_ERROR };

    pub const fn new(id: TileId) -> Self {
        Self { id }
    }

    pub fn is_air(&self) -> bool {
        self.id == TILE_AIR
    }
}

impl From<TileId> for Tile {
    fn from(id: TileId) -> Self {
        Self::new(id)
    }
}

/// A full chunk worth of tiles, indexed `[local_x][local_y]`
pub type TileBlock = [[Tile; CHUNK_SIZE]; CHUNK_SIZE];

/// How the map treats X coordinates past its right edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapBehavior {
    /// Coordinates outside the map are out of range
    #[default]
    NoWrap,
    /// X wraps around the map width (cylindrical planet surface); Y never wraps
    WrapAround,
}

/// Chunk position in chunk-cell coordinates (not tile coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert from tile position to chunk position (floor division by the chunk size)
    pub const fn from_tile(x: i32, y: i32) -> Self {
        Self {
            x: x >> CHUNK_SHIFT,
            y: y >> CHUNK_SHIFT,
        }
    }
}

impl From<(i32, i32)> for ChunkPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<IVec2> for ChunkPos {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<ChunkPos> for IVec2 {
    fn from(pos: ChunkPos) -> Self {
        IVec2::new(pos.x, pos.y)
    }
}
