pub mod error;
pub mod index;
pub mod map;
pub mod plugin;
pub mod storage;

// Re-export commonly used items
pub use error::TileMapError;
pub use index::{ChunkEntry, ChunkIndexTable};
pub use map::{TileMap, TileMapStats};
pub use plugin::{SortTimer, TileMapConfig, TileMapPlugin};
pub use storage::ChunkStorage;
