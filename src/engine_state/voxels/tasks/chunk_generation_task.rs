//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which builds a chunk off the
//! owning thread. The task creates the chunk, populates it from the terrain
//! generator and builds its CPU mesh; only the result is handed back, so the
//! chunk is never visible half-built.

use std::sync::Arc;

use cgmath::Point3;
use log::error;

use crate::{
    engine_state::{
        task_management::task::{Task, TaskResult},
        voxels::{chunk::Chunk, chunk_manager::ChunkManager, generation::TerrainGenerator},
    },
    error::ChunkResult,
};

/// Generates one chunk on a worker thread.
pub struct ChunkGenerationTask {
    /// Chunk-grid coordinate of the chunk to generate
    position: Point3<i32>,
    size: u32,
    seed: u32,
    generator: Arc<dyn TerrainGenerator>,
}

impl ChunkGenerationTask {
    pub fn new(
        position: Point3<i32>,
        size: u32,
        seed: u32,
        generator: Arc<dyn TerrainGenerator>,
    ) -> Self {
        ChunkGenerationTask {
            position,
            size,
            seed,
            generator,
        }
    }

    /// A task generating the chunk at `position` with the settings of `world`.
    pub fn for_world(world: &ChunkManager, position: Point3<i32>) -> Self {
        Self::new(position, world.chunk_size(), world.seed(), world.generator())
    }

    fn build(&self) -> ChunkResult<Chunk> {
        let mut chunk = Chunk::new(self.position, self.size);
        chunk.populate(self.generator.as_ref(), self.seed)?;
        chunk.build_mesh()?;
        Ok(chunk)
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        Box::new(ChunkGenerationTaskResult {
            position: self.position,
            chunk: self.build(),
        })
    }

    fn target(&self) -> Option<Point3<i32>> {
        Some(self.position)
    }
}

/// A finished chunk waiting to be published.
pub struct ChunkGenerationTaskResult {
    position: Point3<i32>,
    chunk: ChunkResult<Chunk>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Publishes the chunk unless the world no longer wants it.
    fn handle_result(self: Box<Self>, world: &mut ChunkManager) -> Vec<Box<dyn Task + Send>> {
        match self.chunk {
            Ok(chunk) => {
                world.publish_chunk(chunk);
            }
            Err(e) => error!("Failed to generate chunk {:?}: {e}", self.position),
        }
        Vec::new()
    }

    fn target(&self) -> Option<Point3<i32>> {
        Some(self.position)
    }
}
