use super::index::ChunkIndexTable;
use crate::tiles::Chunk;
use bevy::prelude::*;

/// Physical chunk storage. Slots are dense; a chunk's slot only changes when
/// [`ChunkStorage::sort_by_usage`] reorders them, and every move is mirrored
/// into the index table through the chunk's recorded cell.
#[derive(Debug, Clone, Default)]
pub struct ChunkStorage {
    chunks: Vec<Chunk>,
}

impl ChunkStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Chunk> {
        self.chunks.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Chunk> {
        self.chunks.get_mut(slot)
    }

    pub fn as_slice(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Append a chunk for `cell`, record the back-reference and publish the new slot
    pub(crate) fn push(
        &mut self,
        mut chunk: Chunk,
        cell: usize,
        table: &mut ChunkIndexTable,
    ) -> usize {
        let slot = self.chunks.len();
        chunk.cell = cell;
        self.chunks.push(chunk);
        table.publish(cell, slot);
        debug!("Materialized chunk {:?} at slot {}", table.position(cell), slot);
        slot
    }

    /// Clear every chunk's access counter. Slots and back-references are untouched.
    pub(crate) fn reset_usage(&mut self) {
        for chunk in self.chunks.iter_mut() {
            chunk.reset_usage();
        }
    }

    /// Reorder slots from most used to least used.
    ///
    /// Quicksort with the first element of each range as pivot. The pivot is
    /// placed at its rank (number of elements with usage >= its own) and the
    /// remainder is partitioned around it with two pointers. Returns the number
    /// of swaps performed.
    pub(crate) fn sort_by_usage(&mut self, table: &mut ChunkIndexTable) -> usize {
        if self.chunks.is_empty() {
            return 0;
        }

        let mut sorter = UsageSort {
            chunks: &mut self.chunks,
            table,
            swaps: 0,
        };
        let len = sorter.chunks.len();
        sorter.sort(0, len);
        sorter.swaps
    }
}

struct UsageSort<'a> {
    chunks: &'a mut [Chunk],
    table: &'a mut ChunkIndexTable,
    swaps: usize,
}

impl UsageSort<'_> {
    /// Sort `lo..hi`. Recurses into the smaller side and loops over the larger,
    /// keeping stack depth logarithmic even on adversarial usage counts.
    fn sort(&mut self, mut lo: usize, mut hi: usize) {
        while hi - lo > 1 {
            let p = self.partition(lo, hi - 1);
            if p - lo < hi - (p + 1) {
                self.sort(lo, p);
                lo = p + 1;
            } else {
                self.sort(p + 1, hi);
                hi = p;
            }
        }
    }

    /// Partition the inclusive range `start..=end`, returning the pivot's final slot
    fn partition(&mut self, start: usize, end: usize) -> usize {
        let pivot = self.chunks[start].usage;

        let count = self.chunks[start + 1..=end]
            .iter()
            .filter(|chunk| chunk.usage >= pivot)
            .count();

        let pi = start + count;
        self.swap(pi, start);

        let (mut i, mut j) = (start, end);
        while i < pi && j > pi {
            while self.chunks[i].usage >= pivot {
                i += 1;
            }
            while self.chunks[j].usage < pivot {
                j -= 1;
            }

            if i < pi && j > pi {
                self.swap(i, j);
                i += 1;
                j -= 1;
            }
        }

        pi
    }

    /// Swap two slots and repoint both chunks' cells at their new slots
    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.chunks.swap(a, b);
        self.table.publish(self.chunks[a].cell, a);
        self.table.publish(self.chunks[b].cell, b);
        self.swaps += 1;
        trace!("Swapped chunk slots {} and {}", a, b);
    }
}
