/// Error type for tile map operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileMapError {
    /// A write-type access targeted a tile outside the map
    OutOfRange { x: i32, y: i32 },
    /// Map dimensions must be non-zero multiples of the chunk size
    InvalidDimensions { width: u32, height: u32 },
    /// The cell already has a chunk in storage
    ChunkExists { x: i32, y: i32 },
}

impl std::fmt::Display for TileMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileMapError::OutOfRange { x, y } => {
                write!(f, "Tile ({}, {}) is out of range", x, y)
            }
            TileMapError::InvalidDimensions { width, height } => write!(
                f,
                "Invalid map dimensions {}x{}: must be non-zero multiples of {}",
                width,
                height,
                crate::tiles::CHUNK_SIZE
            ),
            TileMapError::ChunkExists { x, y } => {
                write!(f, "Chunk containing tile ({}, {}) already exists", x, y)
            }
        }
    }
}

impl std::error::Error for TileMapError {}
