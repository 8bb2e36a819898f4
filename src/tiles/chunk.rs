use super::{constants::*, types::*};

/// Shared stand-in for reads outside the map. Never stored, never mutated.
pub static ERROR_CHUNK: Chunk = Chunk::filled(Tile::ERROR);

/// Shared stand-in for reads of cells without storage. Never stored, never mutated.
pub static EMPTY_CHUNK: Chunk = Chunk::new();

/// A 16x16 block of tiles plus the bookkeeping the tile map needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Tiles indexed `[local_x][local_y]`
    tiles: TileBlock,
    /// Access counter, bumped by chunk lookups. Basis for reordering.
    pub(crate) usage: u32,
    /// Mutation counter, for cheap "has this changed" checks
    pub(crate) sequence: u32,
    /// Index table cell that currently points at this chunk's slot
    pub(crate) cell: usize,
}

impl Chunk {
    /// Create a chunk filled with air
    pub const fn new() -> Self {
        Self::filled(Tile::AIR)
    }

    /// Create a chunk with every tile set to `tile`
    pub const fn filled(tile: Tile) -> Self {
        Self::from_tiles([[tile; CHUNK_SIZE]; CHUNK_SIZE])
    }

    pub const fn from_tiles(tiles: TileBlock) -> Self {
        Self {
            tiles,
            usage: 0,
            sequence: 0,
            cell: 0,
        }
    }

    pub fn usage(&self) -> u32 {
        self.usage
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Index table cell this chunk is published under
    pub fn cell(&self) -> usize {
        self.cell
    }

    pub fn tiles(&self) -> &TileBlock {
        &self.tiles
    }

    /// Get tile at local chunk coordinates (0-15, 0-15)
    pub fn get_tile(&self, local_x: usize, local_y: usize) -> Option<Tile> {
        if local_x >= CHUNK_SIZE || local_y >= CHUNK_SIZE {
            return None;
        }
        Some(self.tiles[local_x][local_y])
    }

    /// Set tile at local chunk coordinates (0-15, 0-15), bumping the sequence
    pub fn set_tile(&mut self, local_x: usize, local_y: usize, tile: Tile) -> bool {
        if local_x >= CHUNK_SIZE || local_y >= CHUNK_SIZE {
            return false;
        }
        self.touch();
        self.tiles[local_x][local_y] = tile;
        true
    }

    /// Overwrite the whole tile block, bumping the sequence once
    pub fn set_tiles(&mut self, tiles: &TileBlock) {
        self.touch();
        self.tiles = *tiles;
    }

    /// Mutable access to a single tile, bumping the sequence once
    pub fn tile_mut(&mut self, local_x: usize, local_y: usize) -> Option<&mut Tile> {
        if local_x >= CHUNK_SIZE || local_y >= CHUNK_SIZE {
            return None;
        }
        self.touch();
        Some(&mut self.tiles[local_x][local_y])
    }

    /// Clear the access counter, e.g. to decay usage between reorders
    pub fn reset_usage(&mut self) {
        self.usage = 0;
    }

    /// CRC32 over the tile ids. Identifies content independent of slot and counters.
    pub fn checksum(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        for column in self.tiles.iter() {
            for tile in column.iter() {
                hasher.update(&tile.id.to_le_bytes());
            }
        }
        hasher.finalize()
    }

    pub(crate) fn bump_usage(&mut self) {
        self.usage = self.usage.saturating_add(1);
    }

    fn touch(&mut self) {
        self.sequence = self.sequence.wrapping_add(1);
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper functions for tile coordinate conversions
pub mod coords {
    use super::*;

    /// Convert tile position to chunk-cell position
    pub fn tile_to_cell(x: i32, y: i32) -> ChunkPos {
        ChunkPos::from_tile(x, y)
    }

    /// Local tile position within its chunk (0-15, 0-15)
    pub fn tile_to_local(x: i32, y: i32) -> (usize, usize) {
        ((x & CHUNK_MASK) as usize, (y & CHUNK_MASK) as usize)
    }

    /// First tile coordinate of the chunk containing `v`
    pub fn chunk_base(v: i32) -> i32 {
        v & !CHUNK_MASK
    }
}
