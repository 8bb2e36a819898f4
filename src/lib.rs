//! Sparse chunked tile storage for planet surfaces.
//!
//! A [`TileMap`] covers a fixed grid of tiles but only allocates the 16x16
//! chunks that are written to. An index table maps every chunk cell to either a
//! sentinel or a storage slot, and [`TileMap::sort_by_usage`] reorders storage so
//! the most used chunks sit first.

pub mod planet;
pub mod tiles;

pub use planet::{ChunkEntry, TileMap, TileMapConfig, TileMapError, TileMapPlugin};
pub use tiles::{Chunk, Tile, TileBlock, TileId, WrapBehavior};
