//! CPU-side mesh of a chunk.

use super::VERTICES_PER_CUBE;
use crate::engine_state::rendering::vertex::{Position, TexCoord};

/// Vertex and texture coordinate arrays produced by the last mesh build.
///
/// Both arrays always hold the same number of elements, and element `i` of one
/// belongs to element `i` of the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    pub(super) positions: Vec<Position>,
    pub(super) uvs: Vec<TexCoord>,
}

impl ChunkMesh {
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn uvs(&self) -> &[TexCoord] {
        &self.uvs
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The 36 positions emitted for the voxel whose block starts at `offset`.
    pub fn cube_positions(&self, offset: usize) -> Option<&[Position]> {
        self.positions.get(offset..offset + VERTICES_PER_CUBE)
    }

    pub fn cube_uvs(&self, offset: usize) -> Option<&[TexCoord]> {
        self.uvs.get(offset..offset + VERTICES_PER_CUBE)
    }

    /// Position data as bytes, ready for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Texture coordinate data as bytes, ready for upload.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }
}
