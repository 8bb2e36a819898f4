use super::types::TileId;

/// Number of bits a tile coordinate is shifted by to get its chunk-cell coordinate
pub const CHUNK_SHIFT: u32 = 4;

/// Size of each chunk in tiles (width and height)
pub const CHUNK_SIZE: usize = 1 << CHUNK_SHIFT; // 16

/// Size of each chunk as i32 for coordinate calculations
pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Mask selecting the chunk-local part of a tile coordinate
pub const CHUNK_MASK: i32 = CHUNK_SIZE_I32 - 1; // 0x0F

// Tile type constants
/// Empty/air tile
pub const TILE_AIR: TileId = 0;

/// Tile id used to fill the shared error chunk
pub const TILE_ERROR: TileId = TileId::MAX;

// Raw index table codes, kept for diagnostics output
/// Cell coordinate out of bounds
pub const CODE_ERROR: u64 = 0;
/// Cell explicitly marked as empty
pub const CODE_EMPTY: u64 = 1;
/// Cell never touched
pub const CODE_UNEXPLORED: u64 = 2;
/// Bias added to a storage slot to form its table code
pub const CODE_SLOT_BIAS: u64 = 3;
