//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a cubic grid of `N³` blocks, its
//! place in the world, and the mesh and GPU buffers built from it.
//!
//! ## Lifecycle
//!
//! 1. [`Chunk::new`] creates an unpopulated chunk. Every query or edit fails
//!    with [`ChunkError::UninitializedChunk`] until step 2.
//! 2. [`Chunk::populate`] fills the grid from a terrain generator, exactly once.
//! 3. Edits mutate single voxels and mark the mesh dirty.
//! 4. [`Chunk::prepare`] rebuilds a dirty mesh and re-uploads it before the
//!    chunk is drawn.
//! 5. The chunk manager drops the chunk on eviction and hands its buffers back
//!    to the backend.
//!
//! ## Memory Layout
//!
//! Blocks are stored in one flat vector, `x` fastest, then `y`, then `z`
//! (see [`chunk_creation`]). The mesh uses the same order.

use cgmath::{Matrix4, Point3, Vector3};
use log::debug;

use super::{block::BlockInstance, coords::CUBE_EDGE_LENGTH, generation::TerrainGenerator};
use crate::{
    engine_state::rendering::{
        meshing::{ChunkMesh, Mesher},
        shader::ChunkProgram,
        vertex::{Position, TexCoord},
        BufferHandle, BufferTarget, BufferUsage, GraphicsBackend, MatrixUniform, RenderMode,
    },
    error::{ChunkError, ChunkResult, GraphicsBackendError, GraphicsResult, WorldResult},
};

pub mod chunk_creation;
pub mod chunk_iteration;

use chunk_iteration::ChunkBlockIterator;

/// GPU buffers holding a chunk's uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBuffers {
    pub positions: BufferHandle,
    pub uvs: BufferHandle,
}

impl ChunkBuffers {
    /// Returns both buffers to the backend.
    pub fn release(self, backend: &mut impl GraphicsBackend) {
        backend.release_buffer(self.positions);
        backend.release_buffer(self.uvs);
    }
}

/// A cubic region of `size³` voxels.
#[derive(Debug)]
pub struct Chunk {
    /// Chunk-grid coordinate (origin / size).
    position: Point3<i32>,
    /// World-space minimum corner, a multiple of `size` on every axis.
    origin: Point3<i32>,
    size: u32,
    /// `None` until populated.
    blocks: Option<Vec<BlockInstance>>,
    mesh: Option<ChunkMesh>,
    buffers: Option<ChunkBuffers>,
    /// The mesh no longer reflects `blocks`.
    dirty: bool,
    /// The mesh changed since it was last uploaded.
    needs_upload: bool,
}

impl Chunk {
    /// Creates an unpopulated chunk at chunk-grid coordinate `position`.
    pub fn new(position: Point3<i32>, size: u32) -> Self {
        let n = size as i32;
        Chunk {
            position,
            origin: Point3::new(position.x * n, position.y * n, position.z * n),
            size,
            blocks: None,
            mesh: None,
            buffers: None,
            dirty: true,
            needs_upload: false,
        }
    }

    /// Creates a chunk directly from a finished grid.
    pub fn with_blocks(position: Point3<i32>, size: u32, blocks: Vec<BlockInstance>) -> ChunkResult<Self> {
        let mut chunk = Self::new(position, size);
        chunk.fill(blocks)?;
        Ok(chunk)
    }

    /// Fills the grid from `generator`.
    ///
    /// # Errors
    /// [`ChunkError::AlreadyPopulated`] on a second call, and
    /// [`ChunkError::GridSizeMismatch`] if the generator returns the wrong number of blocks.
    pub fn populate(&mut self, generator: &dyn TerrainGenerator, seed: u32) -> ChunkResult<()> {
        if self.blocks.is_some() {
            return Err(ChunkError::AlreadyPopulated {
                origin: self.origin,
            });
        }
        let blocks = generator.generate(seed, self.origin, self.size);
        self.fill(blocks)?;
        debug!("Populated chunk at {:?}", self.origin);
        Ok(())
    }

    fn fill(&mut self, blocks: Vec<BlockInstance>) -> ChunkResult<()> {
        let expected = self.volume();
        if blocks.len() != expected {
            return Err(ChunkError::GridSizeMismatch {
                expected,
                actual: blocks.len(),
            });
        }
        self.blocks = Some(blocks);
        self.dirty = true;
        Ok(())
    }

    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    pub fn origin(&self) -> Point3<i32> {
        self.origin
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of voxels in the chunk.
    pub fn volume(&self) -> usize {
        (self.size as usize).pow(3)
    }

    pub fn is_populated(&self) -> bool {
        self.blocks.is_some()
    }

    /// Whether the mesh must be rebuilt before the chunk is next drawn.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn index(&self, local: Point3<usize>) -> ChunkResult<usize> {
        let n = self.size as usize;
        if local.x >= n || local.y >= n || local.z >= n {
            return Err(ChunkError::OutOfRange {
                local,
                size: self.size,
            });
        }
        Ok(local.x + n * (local.y + n * local.z))
    }

    /// The populated grid in storage order.
    pub fn blocks(&self) -> ChunkResult<&[BlockInstance]> {
        self.blocks
            .as_deref()
            .ok_or(ChunkError::UninitializedChunk {
                origin: self.origin,
            })
    }

    fn blocks_mut(&mut self) -> ChunkResult<&mut Vec<BlockInstance>> {
        let origin = self.origin;
        self.blocks
            .as_mut()
            .ok_or(ChunkError::UninitializedChunk { origin })
    }

    /// The block at a local coordinate.
    ///
    /// # Errors
    /// [`ChunkError::UninitializedChunk`] before population and
    /// [`ChunkError::OutOfRange`] for coordinates outside `[0, size)`.
    pub fn get_block(&self, local: Point3<usize>) -> ChunkResult<&BlockInstance> {
        let blocks = self.blocks()?;
        let index = self.index(local)?;
        Ok(&blocks[index])
    }

    /// Replaces the block at `local`, returning the previous one.
    pub fn set_block(&mut self, local: Point3<usize>, block: BlockInstance) -> ChunkResult<BlockInstance> {
        self.blocks()?;
        let index = self.index(local)?;
        let previous = std::mem::replace(&mut self.blocks_mut()?[index], block);
        self.dirty = true;
        Ok(previous)
    }

    /// Removes the block at `local` by writing `replacement` (usually air).
    pub fn break_block(
        &mut self,
        local: Point3<usize>,
        replacement: BlockInstance,
    ) -> ChunkResult<BlockInstance> {
        self.set_block(local, replacement)
    }

    /// Puts `block` at `local`, whatever was there before.
    pub fn place_block(&mut self, local: Point3<usize>, block: BlockInstance) -> ChunkResult<BlockInstance> {
        self.set_block(local, block)
    }

    /// Iterates every voxel with its local coordinate, in storage order.
    pub fn iter_blocks(&self) -> ChunkResult<ChunkBlockIterator<'_>> {
        Ok(ChunkBlockIterator::new(self.blocks()?, self.size))
    }

    /// Number of voxels holding a solid block.
    pub fn solid_count(&self) -> ChunkResult<usize> {
        Ok(self.blocks()?.iter().filter(|block| block.is_solid()).count())
    }

    /// Rebuilds the mesh from the current grid.
    pub fn build_mesh(&mut self) -> ChunkResult<&ChunkMesh> {
        let mesh = Mesher::build(self.blocks()?, self.size)?;
        Ok(self.install_mesh(mesh))
    }

    /// Adopts a mesh built elsewhere (e.g. on a worker thread) from this chunk's
    /// current grid.
    pub fn set_mesh(&mut self, mesh: ChunkMesh) -> ChunkResult<()> {
        let expected = crate::engine_state::rendering::meshing::vertex_count_for(self.size);
        if mesh.vertex_count() != expected {
            return Err(ChunkError::GridSizeMismatch {
                expected,
                actual: mesh.vertex_count(),
            });
        }
        self.install_mesh(mesh);
        Ok(())
    }

    fn install_mesh(&mut self, mesh: ChunkMesh) -> &ChunkMesh {
        self.dirty = false;
        self.needs_upload = true;
        self.mesh.insert(mesh)
    }

    /// The mesh from the last build, possibly stale (see [`is_dirty`](Self::is_dirty)).
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Vertex count of the last built mesh, zero if none was built.
    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, ChunkMesh::vertex_count)
    }

    pub fn buffers(&self) -> Option<ChunkBuffers> {
        self.buffers
    }

    /// Detaches the GPU buffers so the caller can release them.
    pub fn take_buffers(&mut self) -> Option<ChunkBuffers> {
        self.needs_upload = self.mesh.is_some();
        self.buffers.take()
    }

    /// Creates the chunk's buffers if needed and uploads the current mesh.
    pub fn upload(&mut self, backend: &mut impl GraphicsBackend) -> GraphicsResult<()> {
        let Some(mesh) = self.mesh.as_ref() else {
            return Ok(());
        };
        let buffers = match self.buffers {
            Some(buffers) => buffers,
            None => {
                let positions = backend.create_buffer(BufferTarget::Array, BufferUsage::DynamicDraw)?;
                let uvs = match backend.create_buffer(BufferTarget::Array, BufferUsage::DynamicDraw) {
                    Ok(uvs) => uvs,
                    Err(e) => {
                        backend.release_buffer(positions);
                        return Err(e);
                    }
                };
                let buffers = ChunkBuffers { positions, uvs };
                self.buffers = Some(buffers);
                buffers
            }
        };
        backend.upload(buffers.positions, mesh.position_bytes())?;
        backend.upload(buffers.uvs, mesh.uv_bytes())?;
        self.needs_upload = false;
        Ok(())
    }

    /// Makes the GPU copy current: rebuilds a dirty mesh, then uploads it if it changed.
    pub fn prepare(&mut self, backend: &mut impl GraphicsBackend) -> WorldResult<()> {
        if self.dirty {
            self.build_mesh()?;
        }
        if self.needs_upload || self.buffers.is_none() {
            self.upload(backend)?;
        }
        Ok(())
    }

    /// Model matrix placing the chunk's mesh in render space.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(
            self.origin.x as f32 * CUBE_EDGE_LENGTH,
            self.origin.y as f32 * CUBE_EDGE_LENGTH,
            self.origin.z as f32 * CUBE_EDGE_LENGTH,
        ))
    }

    /// Issues the draw for this chunk into `slot`.
    ///
    /// The chunk must have been [prepared](Self::prepare) first; a chunk without
    /// uploaded buffers draws nothing.
    pub fn draw(
        &self,
        backend: &mut impl GraphicsBackend,
        program: &ChunkProgram,
        slot: u32,
        mode: RenderMode,
    ) -> GraphicsResult<bool> {
        let Some(buffers) = self.buffers else {
            return Ok(false);
        };
        let vertex_count = self.vertex_count();
        let count = u32::try_from(vertex_count)
            .map_err(|_| GraphicsBackendError::TooManyVertices(vertex_count))?;

        backend.use_program(program.handle())?;
        backend.set_matrix(program.handle(), MatrixUniform::Model, &self.model_matrix())?;
        backend.bind(buffers.positions)?;
        backend.set_vertex_layout(Position::attribute())?;
        backend.bind(buffers.uvs)?;
        backend.set_vertex_layout(TexCoord::attribute())?;
        backend.draw_triangles(slot, count, mode)?;
        Ok(true)
    }
}
