use super::{
    error::TileMapError,
    index::{ChunkEntry, ChunkIndexTable},
    storage::ChunkStorage,
};
use crate::tiles::{
    coords, Chunk, Tile, TileBlock, WrapBehavior, CHUNK_SHIFT, CHUNK_SIZE, EMPTY_CHUNK, ERROR_CHUNK,
};
use bevy::prelude::*;

/// Sparse planet tile map.
///
/// The logical grid is fixed at construction, but only chunks that have been
/// written to are backed by storage. Reads of anything else come back as air
/// (or as the error tile outside the map) without allocating.
#[derive(Resource, Debug, Clone)]
pub struct TileMap {
    width: u32,
    height: u32,
    wrap: WrapBehavior,
    index: ChunkIndexTable,
    storage: ChunkStorage,
}

impl TileMap {
    /// Create a map of `width` x `height` tiles. Both must be non-zero multiples of 16.
    pub fn new(width: u32, height: u32) -> Result<Self, TileMapError> {
        let valid = |v: u32| v > 0 && v % CHUNK_SIZE as u32 == 0 && v <= i32::MAX as u32;
        if !valid(width) || !valid(height) {
            return Err(TileMapError::InvalidDimensions { width, height });
        }

        let columns = (width >> CHUNK_SHIFT) as usize;
        let rows = (height >> CHUNK_SHIFT) as usize;

        Ok(Self {
            width,
            height,
            wrap: WrapBehavior::NoWrap,
            index: ChunkIndexTable::new(columns, rows),
            storage: ChunkStorage::new(),
        })
    }

    pub fn with_wrap(mut self, wrap: WrapBehavior) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn set_wrap(&mut self, wrap: WrapBehavior) {
        self.wrap = wrap;
    }

    pub fn wrap(&self) -> WrapBehavior {
        self.wrap
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn chunk_columns(&self) -> usize {
        self.index.columns()
    }

    pub fn chunk_rows(&self) -> usize {
        self.index.rows()
    }

    /// Number of chunks backed by storage
    pub fn chunk_count(&self) -> usize {
        self.storage.len()
    }

    /// Stored chunks in slot order
    pub fn chunks(&self) -> &[Chunk] {
        self.storage.as_slice()
    }

    pub fn index(&self) -> &ChunkIndexTable {
        &self.index
    }

    /// Index table entry for the chunk containing tile `(x, y)`
    pub fn entry(&self, x: i32, y: i32) -> ChunkEntry {
        self.index.resolve(x, y, self.wrap)
    }

    /// Read access to the chunk containing `(x, y)`.
    ///
    /// Cells without storage return the shared empty chunk, tiles outside the
    /// map the shared error chunk. A stored chunk has its usage bumped.
    pub fn get_chunk(&mut self, x: i32, y: i32) -> &Chunk {
        match self.entry(x, y) {
            ChunkEntry::Error => &ERROR_CHUNK,
            ChunkEntry::Empty | ChunkEntry::Unexplored => &EMPTY_CHUNK,
            ChunkEntry::Slot(slot) => match self.storage.get_mut(slot) {
                Some(chunk) => {
                    chunk.bump_usage();
                    &*chunk
                }
                None => &ERROR_CHUNK,
            },
        }
    }

    /// Mutable access to the chunk containing `(x, y)`, creating it if the cell has no storage
    pub fn get_chunk_mut(&mut self, x: i32, y: i32) -> Result<&mut Chunk, TileMapError> {
        let slot = self.slot_for_write(x, y)?;
        let chunk = self
            .storage
            .get_mut(slot)
            .ok_or(TileMapError::OutOfRange { x, y })?;
        chunk.bump_usage();
        Ok(chunk)
    }

    /// Overwrite the whole chunk containing `(x, y)`.
    ///
    /// Returns false, without writing, if `(x, y)` is outside the map.
    pub fn set_chunk(&mut self, x: i32, y: i32, tiles: &TileBlock) -> bool {
        let slot = match self.slot_for_write(x, y) {
            Ok(slot) => slot,
            Err(e) => {
                debug!("Skipping set_chunk: {}", e);
                return false;
            }
        };

        match self.storage.get_mut(slot) {
            Some(chunk) => {
                chunk.set_tiles(tiles);
                true
            }
            None => false,
        }
    }

    /// Read a tile. Never allocates and never counts as chunk usage.
    pub fn get_tile(&self, x: i32, y: i32) -> Tile {
        match self.entry(x, y) {
            ChunkEntry::Error => Tile::ERROR,
            ChunkEntry::Empty | ChunkEntry::Unexplored => Tile::AIR,
            ChunkEntry::Slot(slot) => {
                let (local_x, local_y) = coords::tile_to_local(x, y);
                self.storage
                    .get(slot)
                    .and_then(|chunk| chunk.get_tile(local_x, local_y))
                    .unwrap_or(Tile::ERROR)
            }
        }
    }

    /// Write a tile, creating its chunk if needed
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> Result<(), TileMapError> {
        let (local_x, local_y) = coords::tile_to_local(x, y);
        let chunk = self.get_chunk_mut(x, y)?;
        chunk.set_tile(local_x, local_y, tile);
        Ok(())
    }

    /// Mutable reference to a tile, creating its chunk if needed.
    ///
    /// Counts as a mutation of the chunk whether or not the tile is changed.
    pub fn tile_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile, TileMapError> {
        let (local_x, local_y) = coords::tile_to_local(x, y);
        self.get_chunk_mut(x, y)?
            .tile_mut(local_x, local_y)
            .ok_or(TileMapError::OutOfRange { x, y })
    }

    /// Store `chunk` as the chunk containing `(x, y)`, returning its slot
    pub fn add_chunk(&mut self, chunk: Chunk, x: i32, y: i32) -> Result<usize, TileMapError> {
        let cell = self
            .index
            .cell_index(x, y, self.wrap)
            .ok_or(TileMapError::OutOfRange { x, y })?;

        match self.index.get(cell) {
            ChunkEntry::Slot(_) => Err(TileMapError::ChunkExists { x, y }),
            _ => Ok(self.storage.push(chunk, cell, &mut self.index)),
        }
    }

    /// Mark the unexplored cell containing `(x, y)` as explored and empty
    pub fn mark_empty(&mut self, x: i32, y: i32) -> bool {
        match self.index.cell_index(x, y, self.wrap) {
            Some(cell) => self.index.mark_empty(cell),
            None => false,
        }
    }

    /// Reorder chunk storage from most to least used. Returns the number of swaps.
    pub fn sort_by_usage(&mut self) -> usize {
        let swaps = self.storage.sort_by_usage(&mut self.index);
        debug!(
            "Sorted {} chunks by usage ({} swaps)",
            self.storage.len(),
            swaps
        );

        #[cfg(feature = "debug_chunks")]
        debug!("{}", self.index.render_grid());

        swaps
    }

    /// Clear the usage of every stored chunk, so the next sort ranks recent access only
    pub fn reset_usage(&mut self) {
        self.storage.reset_usage();
    }

    /// Get statistics about the map state
    pub fn stats(&self) -> TileMapStats {
        let mut stats = TileMapStats {
            chunk_columns: self.chunk_columns(),
            chunk_rows: self.chunk_rows(),
            materialized: 0,
            empty: 0,
            unexplored: 0,
            total_usage: 0,
        };
        for entry in self.index.iter() {
            match entry {
                ChunkEntry::Slot(_) => stats.materialized += 1,
                ChunkEntry::Empty => stats.empty += 1,
                ChunkEntry::Unexplored => stats.unexplored += 1,
                ChunkEntry::Error => {}
            }
        }
        stats.total_usage = self.chunks().iter().map(|c| c.usage() as u64).sum();
        stats
    }

    /// Slot of the chunk containing `(x, y)`, creating the chunk if the cell has no storage
    fn slot_for_write(&mut self, x: i32, y: i32) -> Result<usize, TileMapError> {
        let cell = self
            .index
            .cell_index(x, y, self.wrap)
            .ok_or(TileMapError::OutOfRange { x, y })?;

        match self.index.get(cell) {
            ChunkEntry::Slot(slot) => Ok(slot),
            ChunkEntry::Empty | ChunkEntry::Unexplored => {
                Ok(self.storage.push(Chunk::new(), cell, &mut self.index))
            }
            ChunkEntry::Error => Err(TileMapError::OutOfRange { x, y }),
        }
    }
}

/// Statistics about the current map state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMapStats {
    pub chunk_columns: usize,
    pub chunk_rows: usize,
    pub materialized: usize,
    pub empty: usize,
    pub unexplored: usize,
    pub total_usage: u64,
}

impl std::fmt::Display for TileMapStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Grid: {}x{}, Materialized: {}, Empty: {}, Unexplored: {}, Usage: {}",
            self.chunk_columns,
            self.chunk_rows,
            self.materialized,
            self.empty,
            self.unexplored,
            self.total_usage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Tile = Tile::new(1);
    const B: Tile = Tile::new(2);

    fn small_map() -> TileMap {
        TileMap::new(32, 32).unwrap()
    }

    fn assert_back_references(map: &TileMap) {
        for (slot, chunk) in map.chunks().iter().enumerate() {
            assert_eq!(map.index().get(chunk.cell()), ChunkEntry::Slot(slot));
        }
    }

    #[test]
    fn test_new_validates_dimensions() {
        let map = TileMap::new(64, 32).unwrap();
        assert_eq!(map.chunk_columns(), 4);
        assert_eq!(map.chunk_rows(), 2);
        assert_eq!(map.chunk_count(), 0);
        assert_eq!(map.wrap(), WrapBehavior::NoWrap);

        assert_eq!(
            TileMap::new(20, 16).unwrap_err(),
            TileMapError::InvalidDimensions { width: 20, height: 16 }
        );
        assert!(TileMap::new(0, 16).is_err());
        assert!(TileMap::new(16, 0).is_err());
    }

    #[test]
    fn test_unwritten_tiles_are_air() {
        let mut map = small_map();
        assert!(map.mark_empty(20, 0));

        for x in 0..32 {
            for y in 0..32 {
                assert_eq!(map.get_tile(x, y), Tile::AIR);
            }
        }
        assert_eq!(map.chunk_count(), 0);
    }

    #[test]
    fn test_set_then_get_tile() {
        let mut map = small_map();
        map.set_tile(5, 5, A).unwrap();
        assert_eq!(map.get_tile(5, 5), A);

        // Different, unmaterialized chunk
        assert_eq!(map.get_tile(20, 20), Tile::AIR);
        assert_eq!(map.chunk_count(), 1);

        // Reading an unmaterialized chunk never creates storage
        for _ in 0..3 {
            assert_eq!(map.get_chunk(20, 20).usage(), 0);
        }
        assert_eq!(map.chunk_count(), 1);

        // Each read of a stored chunk counts as a use
        let before = map.get_chunk(5, 5).usage();
        assert_eq!(map.get_chunk(5, 5).usage(), before + 1);
        assert_eq!(map.get_chunk(5, 5).usage(), before + 2);
    }

    #[test]
    fn test_get_tile_does_not_count_usage() {
        let mut map = small_map();
        map.set_tile(1, 1, A).unwrap();
        let usage = map.chunks()[0].usage();
        for _ in 0..10 {
            map.get_tile(1, 1);
        }
        assert_eq!(map.chunks()[0].usage(), usage);
    }

    #[test]
    fn test_set_tile_bumps_sequence() {
        let mut map = small_map();
        map.set_tile(3, 4, A).unwrap();
        map.set_tile(3, 5, B).unwrap();
        let chunk = &map.chunks()[0];
        assert_eq!(chunk.sequence(), 2);
        assert_eq!(chunk.usage(), 2);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut map = small_map();
        assert_eq!(map.get_tile(32, 0), Tile::ERROR);
        assert_eq!(map.get_tile(-1, 0), Tile::ERROR);
        assert!(std::ptr::eq(map.get_chunk(0, 32), &ERROR_CHUNK));
        assert!(std::ptr::eq(map.get_chunk(0, 0), &EMPTY_CHUNK));

        assert_eq!(
            map.set_tile(32, 0, A),
            Err(TileMapError::OutOfRange { x: 32, y: 0 })
        );
        assert!(map.get_chunk_mut(0, -5).is_err());
        assert!(map.tile_mut(100, 100).is_err());
        assert!(!map.set_chunk(0, 40, &[[A; CHUNK_SIZE]; CHUNK_SIZE]));
        assert_eq!(map.chunk_count(), 0);
    }

    #[test]
    fn test_get_chunk_mut_materializes_once() {
        let mut map = TileMap::new(64, 64).unwrap();
        map.set_tile(0, 0, A).unwrap();
        map.set_tile(40, 40, B).unwrap();
        let cells: Vec<usize> = map.chunks().iter().map(Chunk::cell).collect();

        // Unexplored cell
        map.get_chunk_mut(17, 3).unwrap();
        assert_eq!(map.chunk_count(), 3);

        // Empty cell
        assert!(map.mark_empty(50, 50));
        map.get_chunk_mut(50, 50).unwrap();
        assert_eq!(map.chunk_count(), 4);

        // Existing chunk
        map.get_chunk_mut(17, 3).unwrap();
        assert_eq!(map.chunk_count(), 4);

        // Earlier chunks keep their slots and back-references
        for (slot, cell) in cells.iter().enumerate() {
            assert_eq!(map.chunks()[slot].cell(), *cell);
        }
        assert_back_references(&map);
    }

    #[test]
    fn test_set_chunk() {
        let mut map = TileMap::new(64, 64).unwrap();
        let mut block = [[Tile::AIR; CHUNK_SIZE]; CHUNK_SIZE];
        for (i, column) in block.iter_mut().enumerate() {
            for (j, tile) in column.iter_mut().enumerate() {
                *tile = Tile::new((i * CHUNK_SIZE + j) as u16);
            }
        }

        // Any tile inside the chunk addresses the whole chunk
        assert!(map.set_chunk(37, 21, &block));
        let (bx, by) = (coords::chunk_base(37), coords::chunk_base(21));
        for i in 0..CHUNK_SIZE {
            for j in 0..CHUNK_SIZE {
                assert_eq!(map.get_tile(bx + i as i32, by + j as i32), block[i][j]);
            }
        }

        let chunk = &map.chunks()[0];
        assert_eq!(chunk.sequence(), 1);
        assert_eq!(chunk.usage(), 0);
    }

    #[test]
    fn test_tile_mut() {
        let mut map = small_map();
        *map.tile_mut(7, 9).unwrap() = B;
        assert_eq!(map.get_tile(7, 9), B);
        assert_eq!(map.chunks()[0].sequence(), 1);
    }

    #[test]
    fn test_add_chunk() {
        let mut map = small_map();
        let slot = map.add_chunk(Chunk::filled(A), 16, 0).unwrap();
        assert_eq!(slot, 0);
        assert_eq!(map.entry(16, 0), ChunkEntry::Slot(0));
        assert_eq!(map.get_tile(31, 15), A);

        assert_eq!(
            map.add_chunk(Chunk::new(), 20, 2),
            Err(TileMapError::ChunkExists { x: 20, y: 2 })
        );
        assert_eq!(
            map.add_chunk(Chunk::new(), 32, 0),
            Err(TileMapError::OutOfRange { x: 32, y: 0 })
        );
        assert_eq!(map.chunk_count(), 1);
    }

    #[test]
    fn test_wrap_around() {
        let mut map = TileMap::new(64, 32).unwrap().with_wrap(WrapBehavior::WrapAround);
        map.set_tile(70, 3, A).unwrap();
        map.set_tile(-1, 30, B).unwrap();

        for y in 0..32 {
            for x in 0..64 {
                assert_eq!(map.get_tile(x, y), map.get_tile(x + 64, y));
            }
        }
        assert_eq!(map.get_tile(6, 3), A);
        assert_eq!(map.get_tile(63, 30), B);
        assert_eq!(map.chunk_count(), 2);

        // Y never wraps
        assert_eq!(map.get_tile(6, 35), Tile::ERROR);
        assert!(map.set_tile(6, -1, A).is_err());

        // Turning wrap off makes the same coordinates out of range again
        map.set_wrap(WrapBehavior::NoWrap);
        assert_eq!(map.get_tile(70, 3), Tile::ERROR);
    }

    #[test]
    fn test_sort_by_usage_keeps_content() {
        let mut map = TileMap::new(64, 16).unwrap();
        map.set_chunk(0, 0, &[[A; CHUNK_SIZE]; CHUNK_SIZE]);
        map.set_chunk(16, 0, &[[B; CHUNK_SIZE]; CHUNK_SIZE]);
        map.set_chunk(32, 0, &[[Tile::new(3); CHUNK_SIZE]; CHUNK_SIZE]);

        for (x, reads) in [(0, 5), (16, 1), (32, 9)] {
            for _ in 0..reads {
                map.get_chunk(x, 0);
            }
        }

        map.sort_by_usage();

        let usages: Vec<u32> = map.chunks().iter().map(Chunk::usage).collect();
        assert_eq!(usages, vec![9, 5, 1]);
        assert_back_references(&map);

        assert_eq!(map.get_tile(4, 4), A);
        assert_eq!(map.get_tile(20, 4), B);
        assert_eq!(map.get_tile(36, 4), Tile::new(3));
        assert_eq!(map.get_tile(50, 4), Tile::AIR);
    }

    #[test]
    fn test_sort_then_write() {
        let mut map = TileMap::new(128, 128).unwrap();
        for i in 0..40 {
            let (x, y) = ((i * 23) % 128, (i * 41) % 128);
            map.set_tile(x, y, Tile::new(i as u16 + 1)).unwrap();
            for _ in 0..(i % 7) {
                map.get_chunk(x, y);
            }
        }
        map.sort_by_usage();
        assert_back_references(&map);

        // Writes after a reorder land in the right chunk
        map.set_tile(127, 127, A).unwrap();
        map.sort_by_usage();
        assert_eq!(map.get_tile(127, 127), A);
        assert_back_references(&map);
    }

    #[test]
    fn test_reset_usage_between_sorts() {
        let mut map = TileMap::new(64, 16).unwrap();
        map.set_tile(0, 0, A).unwrap();
        map.set_tile(16, 0, B).unwrap();
        for _ in 0..5 {
            map.get_chunk(0, 0);
        }
        map.sort_by_usage();
        map.reset_usage();
        assert_eq!(map.stats().total_usage, 0);
        assert_back_references(&map);

        // After the reset only new reads count
        for _ in 0..2 {
            map.get_chunk(16, 0);
        }
        map.sort_by_usage();
        assert_eq!(map.chunks()[0].get_tile(0, 0), Some(B));
        assert_eq!(map.get_tile(0, 0), A);
        assert_back_references(&map);
    }

    #[test]
    fn test_stats() {
        let mut map = small_map();
        map.set_tile(0, 0, A).unwrap();
        map.get_chunk(0, 0);
        map.mark_empty(16, 16);

        let stats = map.stats();
        assert_eq!(stats.materialized, 1);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.unexplored, 2);
        assert_eq!(stats.total_usage, 2);
        assert_eq!(
            stats.to_string(),
            "Grid: 2x2, Materialized: 1, Empty: 1, Unexplored: 2, Usage: 2"
        );
    }
}
