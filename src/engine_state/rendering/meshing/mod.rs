//! Mesh generation for voxel rendering.
//!
//! This module converts a chunk's voxel grid into flat vertex and texture
//! coordinate arrays the graphics backend can draw as a triangle list.
//!
//! # Architecture
//! - [`Mesher`]: stateless grid to mesh transformation
//! - [`ChunkMesh`]: the resulting position and UV arrays
//! - `cube`: the fixed cube template each voxel is stamped from
//!
//! # Layout
//! Every voxel, air included, contributes one full cube of 36 vertices. The
//! cube for voxel `(x, y, z)` starts at
//!
//! ```text
//! offset = x*36 + N*(y*36 + N*(z*36))
//! ```
//!
//! so `x` varies fastest, then `y`, then `z`. This matches the chunk grid's
//! storage order, so the voxel at grid index `i` owns vertices `i*36..(i+1)*36`.
//!
//! # Performance Considerations
//! - No face culling: hidden faces between neighbouring solids are still emitted.
//!   Skipping faces whose neighbour along the normal is solid is the obvious
//!   next step but changes the offset contract above.

use cgmath::Vector3;

pub mod cube;
mod mesh;

pub use mesh::ChunkMesh;

use crate::{
    engine_state::voxels::{
        block::{block_side::BlockSide, BlockInstance},
        coords::CUBE_EDGE_LENGTH,
    },
    error::{ChunkError, ChunkResult},
};

/// Vertices emitted per voxel: 6 faces of 2 triangles of 3 vertices.
pub const VERTICES_PER_CUBE: usize = 6 * cube::VERTICES_PER_FACE;

/// Start of voxel `(x, y, z)`'s vertex block in a chunk of side `size`.
pub fn voxel_offset(x: usize, y: usize, z: usize, size: usize) -> usize {
    x * VERTICES_PER_CUBE + size * (y * VERTICES_PER_CUBE + size * (z * VERTICES_PER_CUBE))
}

/// Number of vertices in the mesh of a chunk of side `size`.
pub fn vertex_count_for(size: u32) -> usize {
    let size = size as usize;
    size * size * size * VERTICES_PER_CUBE
}

/// Converts voxel grids into meshes.
pub struct Mesher;

impl Mesher {
    /// Builds the mesh of a chunk grid of side `size`.
    ///
    /// `grid` must be in the chunk's z-major storage order. Block types do not
    /// affect the output; every voxel gets the same cube and the same UVs.
    ///
    /// # Errors
    /// [`ChunkError::GridSizeMismatch`] when `grid` does not hold `size³` blocks.
    pub fn build(grid: &[BlockInstance], size: u32) -> ChunkResult<ChunkMesh> {
        let expected = (size as usize).pow(3);
        if grid.len() != expected {
            return Err(ChunkError::GridSizeMismatch {
                expected,
                actual: grid.len(),
            });
        }

        let n = size as usize;
        let total = vertex_count_for(size);
        let mut mesh = ChunkMesh {
            positions: Vec::with_capacity(total),
            uvs: Vec::with_capacity(total),
        };

        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    debug_assert_eq!(mesh.positions.len(), voxel_offset(x, y, z, n));
                    Self::push_cube(&mut mesh, x, y, z);
                }
            }
        }

        Ok(mesh)
    }

    fn push_cube(mesh: &mut ChunkMesh, x: usize, y: usize, z: usize) {
        let translation = Vector3::new(
            x as f32 * CUBE_EDGE_LENGTH,
            y as f32 * CUBE_EDGE_LENGTH,
            z as f32 * CUBE_EDGE_LENGTH,
        );
        for side in BlockSide::all() {
            mesh.positions.extend(
                cube::face_positions(side)
                    .iter()
                    .map(|corner| corner.translated(translation)),
            );
            mesh.uvs.extend_from_slice(cube::face_uvs(side));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::vertex::Position;

    fn solid_grid(size: u32) -> Vec<BlockInstance> {
        vec![BlockInstance::solid(); (size as usize).pow(3)]
    }

    fn template() -> Vec<Position> {
        cube::CUBE_FACES.iter().flatten().copied().collect()
    }

    #[test]
    fn solid_chunk_emits_a_cube_per_voxel() {
        for size in [1, 2, 5] {
            let mesh = Mesher::build(&solid_grid(size), size).unwrap();
            assert_eq!(mesh.vertex_count(), (size as usize).pow(3) * 36);
            assert_eq!(mesh.uvs().len(), mesh.vertex_count());
        }
    }

    #[test]
    fn air_is_meshed_like_any_other_block() {
        let air = vec![BlockInstance::air(); 8];
        assert_eq!(
            Mesher::build(&air, 2).unwrap(),
            Mesher::build(&solid_grid(2), 2).unwrap()
        );
    }

    #[test]
    fn voxel_at_origin_matches_the_template() {
        let mesh = Mesher::build(&solid_grid(4), 4).unwrap();
        assert_eq!(mesh.cube_positions(0).unwrap(), template().as_slice());
        assert_eq!(
            mesh.cube_positions(0).unwrap()[..6],
            [
                Position::new(-1.0, -1.0, -1.0),
                Position::new(1.0, -1.0, -1.0),
                Position::new(1.0, 1.0, -1.0),
                Position::new(1.0, 1.0, -1.0),
                Position::new(-1.0, 1.0, -1.0),
                Position::new(-1.0, -1.0, -1.0),
            ]
        );
    }

    #[test]
    fn voxel_1_2_3_is_the_template_translated_by_twice_its_position() {
        let size = 4;
        let mesh = Mesher::build(&solid_grid(size), size).unwrap();
        let offset = voxel_offset(1, 2, 3, size as usize);
        assert_eq!(offset, 36 + 4 * (2 * 36 + 4 * 3 * 36));

        let expected: Vec<Position> = template()
            .into_iter()
            .map(|corner| corner.translated(Vector3::new(2.0, 4.0, 6.0)))
            .collect();
        assert_eq!(mesh.cube_positions(offset).unwrap(), expected.as_slice());
        // First corner of the front face: (-1, -1, -1) + (2, 4, 6).
        assert_eq!(mesh.positions()[offset], Position::new(1.0, 3.0, 5.0));
        assert_eq!(
            mesh.cube_uvs(offset).unwrap(),
            mesh.cube_uvs(0).unwrap(),
        );
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        assert_eq!(
            Mesher::build(&solid_grid(2), 3),
            Err(ChunkError::GridSizeMismatch {
                expected: 27,
                actual: 8
            })
        );
    }

    #[test]
    fn byte_views_cover_every_vertex() {
        let mesh = Mesher::build(&solid_grid(1), 1).unwrap();
        assert_eq!(mesh.position_bytes().len(), 36 * 12);
        assert_eq!(mesh.uv_bytes().len(), 36 * 8);
    }
}
