use crate::tiles::{
    coords, ChunkPos, WrapBehavior, CODE_EMPTY, CODE_ERROR, CODE_SLOT_BIAS, CODE_UNEXPLORED,
};

/// State of one chunk cell in the index table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkEntry {
    /// Cell coordinate is outside the map
    Error,
    /// Cell was explored and holds nothing
    Empty,
    /// Cell has never been touched
    Unexplored,
    /// Cell is backed by the chunk at this storage slot
    Slot(usize),
}

impl ChunkEntry {
    /// Raw code: 0 = error, 1 = empty, 2 = unexplored, slot + 3 otherwise
    pub fn code(self) -> u64 {
        match self {
            ChunkEntry::Error => CODE_ERROR,
            ChunkEntry::Empty => CODE_EMPTY,
            ChunkEntry::Unexplored => CODE_UNEXPLORED,
            ChunkEntry::Slot(slot) => u64::try_from(slot)
                .unwrap_or(u64::MAX)
                .saturating_add(CODE_SLOT_BIAS),
        }
    }

    pub fn slot(self) -> Option<usize> {
        match self {
            ChunkEntry::Slot(slot) => Some(slot),
            _ => None,
        }
    }
}

/// Dense table mapping every chunk cell of the map to a [`ChunkEntry`].
///
/// Cells are laid out column-major: `index = cell_x * rows + cell_y`.
#[derive(Debug, Clone)]
pub struct ChunkIndexTable {
    entries: Vec<ChunkEntry>,
    columns: usize,
    rows: usize,
}

impl ChunkIndexTable {
    /// Create a table with every cell unexplored
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            entries: vec![ChunkEntry::Unexplored; columns * rows],
            columns,
            rows,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat index of the cell containing tile `(x, y)`, or `None` if it lies outside the map.
    ///
    /// With [`WrapBehavior::WrapAround`] X is taken modulo the map width first,
    /// so negative X wraps too. Y is never wrapped.
    pub fn cell_index(&self, x: i32, y: i32, wrap: WrapBehavior) -> Option<usize> {
        let x = match wrap {
            WrapBehavior::WrapAround if self.columns > 0 => {
                x.rem_euclid(self.width_in_tiles())
            }
            _ => x,
        };
        if x < 0 || y < 0 {
            return None;
        }

        let pos = coords::tile_to_cell(x, y);
        let (cx, cy) = (pos.x as usize, pos.y as usize);
        if cx >= self.columns || cy >= self.rows {
            return None;
        }
        Some(cx * self.rows + cy)
    }

    /// Resolve tile coordinates to the entry of their chunk cell
    pub fn resolve(&self, x: i32, y: i32, wrap: WrapBehavior) -> ChunkEntry {
        match self.cell_index(x, y, wrap) {
            Some(index) => self.entries[index],
            None => ChunkEntry::Error,
        }
    }

    pub fn get(&self, index: usize) -> ChunkEntry {
        self.entries.get(index).copied().unwrap_or(ChunkEntry::Error)
    }

    /// Point a cell at a storage slot
    pub(crate) fn publish(&mut self, index: usize, slot: usize) {
        self.entries[index] = ChunkEntry::Slot(slot);
    }

    /// Mark an unexplored cell as empty. Returns false for any other state.
    pub fn mark_empty(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) if *entry == ChunkEntry::Unexplored => {
                *entry = ChunkEntry::Empty;
                true
            }
            _ => false,
        }
    }

    /// Cell position of a flat index
    pub fn position(&self, index: usize) -> ChunkPos {
        ChunkPos::new((index / self.rows) as i32, (index % self.rows) as i32)
    }

    pub fn iter(&self) -> impl Iterator<Item = ChunkEntry> + '_ {
        self.entries.iter().copied()
    }

    fn width_in_tiles(&self) -> i32 {
        (self.columns as i32) << crate::tiles::CHUNK_SHIFT
    }

    /// Render the table as a grid of raw codes, top row first
    #[cfg(feature = "debug_chunks")]
    pub fn render_grid(&self) -> String {
        let mut grid = String::new();
        grid.push_str("\n╔═══════ Chunk Index Table ═══════╗\n");
        for cy in (0..self.rows).rev() {
            grid.push_str(&format!("{:3} ", cy));
            for cx in 0..self.columns {
                let symbol = match self.entries[cx * self.rows + cy] {
                    ChunkEntry::Unexplored => "   ░".to_string(),
                    entry => format!("{:4}", entry.code()),
                };
                grid.push_str(&symbol);
            }
            grid.push('\n');
        }
        grid.push_str("╚═════════════════════════════════╝");
        grid
    }
}
