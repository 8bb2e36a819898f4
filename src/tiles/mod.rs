pub mod chunk;
pub mod constants;
pub mod types;

// Re-export commonly used items
pub use chunk::{coords, Chunk, EMPTY_CHUNK, ERROR_CHUNK};
pub use constants::*;
pub use types::{ChunkPos, Tile, TileBlock, TileId, WrapBehavior};
