//! # Chunk Iteration Module
//!
//! This module provides an iterator over every voxel of a populated chunk,
//! yielding each block together with its local coordinate.
//!
//! Iteration follows the grid's storage order (x fastest, then y, then z), so
//! the n-th item is the voxel whose mesh vertices start at `n * 36`.

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockInstance;

/// An iterator over all blocks in a chunk, air included.
pub struct ChunkBlockIterator<'a> {
    /// The chunk's flat block storage
    blocks: &'a [BlockInstance],
    /// Side length of the chunk
    size: usize,
    /// Index of the next block to yield
    index: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates an iterator over a flat grid of side `size`.
    pub fn new(blocks: &'a [BlockInstance], size: u32) -> Self {
        ChunkBlockIterator {
            blocks,
            size: size as usize,
            index: 0,
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<usize>, &'a BlockInstance);

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.blocks.get(self.index)?;
        let plane = self.size * self.size;
        let position = Point3::new(
            self.index % self.size,
            (self.index % plane) / self.size,
            self.index / plane,
        );
        self.index += 1;
        Some((position, block))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.blocks.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkBlockIterator<'_> {}
