//! # Chunk Creation Module
//!
//! This module provides the builder used to lay out a chunk's voxel grid in the
//! linear order the rest of the engine expects.
//!
//! ## Memory Layout
//!
//! A chunk of side `N` stores its `N³` blocks in one flat vector where `x` varies
//! fastest, then `y`, then `z`:
//!
//! ```text
//! index(x, y, z) = x + N * (y + N * z)
//! ```
//!
//! The mesher writes its vertex blocks in exactly the same order, so a voxel's
//! grid index times 36 is the start of its vertices.

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockInstance;
use crate::error::{ChunkError, ChunkResult};

/// Builds a chunk grid one block at a time in z-major order.
///
/// The builder tracks the local position of the next block so callers that
/// compute blocks from world coordinates never have to redo the index math.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_world::{BlockInstance, ChunkGridBuilder};
///
/// let grid = ChunkGridBuilder::from_fn(Point3::new(0, -4, 0), 4, |world| {
///     if world.y < 0 { BlockInstance::solid() } else { BlockInstance::air() }
/// });
/// assert_eq!(grid.len(), 64);
/// ```
pub struct ChunkGridBuilder {
    /// World-space origin of the chunk being built
    origin: Point3<i32>,
    /// Side length of the chunk
    size: usize,
    /// Blocks pushed so far, in z-major order
    blocks: Vec<BlockInstance>,
    /// Local position of the next block to be pushed
    local_x: usize,
    local_y: usize,
    local_z: usize,
}

impl ChunkGridBuilder {
    /// Creates an empty builder for a chunk at `origin` with `size` voxels per axis.
    pub fn new(origin: Point3<i32>, size: u32) -> Self {
        let size = size as usize;
        ChunkGridBuilder {
            origin,
            size,
            blocks: Vec::with_capacity(size * size * size),
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// Builds a whole grid by evaluating `block_at` at every voxel's world position.
    pub fn from_fn(
        origin: Point3<i32>,
        size: u32,
        mut block_at: impl FnMut(Point3<i32>) -> BlockInstance,
    ) -> Vec<BlockInstance> {
        let mut builder = Self::new(origin, size);
        while let Some(world) = builder.next_world_position() {
            builder.push_block(block_at(world));
        }
        builder.blocks
    }

    /// World position of the voxel the next [`push_block`](Self::push_block) fills,
    /// or `None` once the grid is complete.
    pub fn next_world_position(&self) -> Option<Point3<i32>> {
        if self.is_complete() {
            return None;
        }
        Some(Point3::new(
            self.origin.x + self.local_x as i32,
            self.origin.y + self.local_y as i32,
            self.origin.z + self.local_z as i32,
        ))
    }

    /// Appends a block at the current position and advances x, then y, then z.
    ///
    /// Pushing past the end of the grid is ignored; [`finish`](Self::finish)
    /// reports the size mismatch instead.
    pub fn push_block(&mut self, block: BlockInstance) {
        if self.is_complete() {
            return;
        }
        self.blocks.push(block);

        self.local_x += 1;
        if self.local_x == self.size {
            self.local_x = 0;
            self.local_y += 1;

            if self.local_y == self.size {
                self.local_y = 0;
                self.local_z += 1;
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.local_z >= self.size
    }

    /// Returns the finished grid.
    ///
    /// # Errors
    /// [`ChunkError::GridSizeMismatch`] if fewer than `size³` blocks were pushed.
    pub fn finish(self) -> ChunkResult<Vec<BlockInstance>> {
        let expected = self.size * self.size * self.size;
        if self.blocks.len() != expected {
            return Err(ChunkError::GridSizeMismatch {
                expected,
                actual: self.blocks.len(),
            });
        }
        Ok(self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_world_positions_in_z_major_order() {
        let mut visited = Vec::new();
        let grid = ChunkGridBuilder::from_fn(Point3::new(-2, 0, 4), 2, |world| {
            visited.push(world);
            BlockInstance::air()
        });

        assert_eq!(grid.len(), 8);
        assert_eq!(
            visited,
            vec![
                Point3::new(-2, 0, 4),
                Point3::new(-1, 0, 4),
                Point3::new(-2, 1, 4),
                Point3::new(-1, 1, 4),
                Point3::new(-2, 0, 5),
                Point3::new(-1, 0, 5),
                Point3::new(-2, 1, 5),
                Point3::new(-1, 1, 5),
            ]
        );
    }

    #[test]
    fn finish_reports_incomplete_grids() {
        let mut builder = ChunkGridBuilder::new(Point3::new(0, 0, 0), 2);
        builder.push_block(BlockInstance::solid());
        assert_eq!(
            builder.finish(),
            Err(ChunkError::GridSizeMismatch {
                expected: 8,
                actual: 1
            })
        );
    }
}
