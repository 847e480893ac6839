//! # Coordinate Mapping
//!
//! Every position in the world lives in one of three spaces:
//!
//! * **World space**: integer voxel coordinates, unbounded in both directions.
//! * **Chunk-grid space**: a chunk's origin divided by the chunk size.
//! * **Local space**: a voxel's offset inside its chunk, each axis in `[0, N)`.
//!
//! All conversions go through [`CoordinateMapper`] and use floor division, so a
//! world coordinate of `-1` with a chunk size of 16 lands in chunk `-1` at local
//! `15`, and `-16` lands in chunk `-1` at local `0`.
//!
//! Render space (what the mesher emits) scales voxels by the cube edge length of
//! 2 with each cube centred on `2 * voxel`; [`CoordinateMapper::render_to_world`]
//! undoes that for camera positions.

use cgmath::Point3;
use num::Integer;

use crate::error::{CoordinateError, CoordinateResult};

/// Edge length of one voxel cube in render space.
pub const CUBE_EDGE_LENGTH: f32 = 2.0;

/// Where a world-space voxel lives: its owning chunk and its offset inside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkLocation {
    /// Chunk-grid coordinate of the owning chunk.
    pub chunk: Point3<i32>,
    /// Offset of the voxel inside the owning chunk.
    pub local: Point3<usize>,
}

/// Translates positions between world, chunk-grid and local space for one chunk size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoordinateMapper {
    chunk_size: i32,
}

impl CoordinateMapper {
    /// Creates a mapper for chunks with `chunk_size` voxels per axis.
    ///
    /// # Errors
    /// Returns [`CoordinateError::ZeroChunkSize`] for a size of zero, and
    /// [`CoordinateError::ChunkSizeTooLarge`] for sizes that do not fit an `i32`.
    pub fn new(chunk_size: u32) -> CoordinateResult<Self> {
        if chunk_size == 0 {
            return Err(CoordinateError::ZeroChunkSize);
        }
        let chunk_size =
            i32::try_from(chunk_size).map_err(|_| CoordinateError::ChunkSizeTooLarge(chunk_size))?;
        Ok(Self { chunk_size })
    }

    /// Side length of a chunk in voxels.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size as u32
    }

    /// Splits one world axis into `(chunk index, local offset)`.
    ///
    /// Satisfies `chunk * N + local == world` and `0 <= local < N` for every `world`.
    pub fn map_axis(&self, world: i32) -> (i32, usize) {
        let (chunk, local) = world.div_mod_floor(&self.chunk_size);
        (chunk, local as usize)
    }

    /// Locates the chunk and local offset of a world-space voxel.
    pub fn locate(&self, world: Point3<i32>) -> ChunkLocation {
        let (cx, lx) = self.map_axis(world.x);
        let (cy, ly) = self.map_axis(world.y);
        let (cz, lz) = self.map_axis(world.z);
        ChunkLocation {
            chunk: Point3::new(cx, cy, cz),
            local: Point3::new(lx, ly, lz),
        }
    }

    /// Chunk-grid coordinate of the chunk holding `world`.
    pub fn chunk_of(&self, world: Point3<i32>) -> Point3<i32> {
        self.locate(world).chunk
    }

    /// World-space origin (minimum corner) of a chunk.
    pub fn chunk_origin(&self, chunk: Point3<i32>) -> Point3<i32> {
        Point3::new(
            chunk.x * self.chunk_size,
            chunk.y * self.chunk_size,
            chunk.z * self.chunk_size,
        )
    }

    /// Inverse of [`locate`](Self::locate).
    pub fn to_world(&self, location: ChunkLocation) -> Point3<i32> {
        let origin = self.chunk_origin(location.chunk);
        Point3::new(
            origin.x + location.local.x as i32,
            origin.y + location.local.y as i32,
            origin.z + location.local.z as i32,
        )
    }

    /// Floors a continuous world position onto the voxel that contains it.
    ///
    /// # Errors
    /// Fails fast on NaN or infinite input and on values outside the `i32` range,
    /// instead of producing a silently wrong voxel.
    pub fn voxel_at(position: Point3<f32>) -> CoordinateResult<Point3<i32>> {
        Ok(Point3::new(
            floor_axis('x', position.x)?,
            floor_axis('y', position.y)?,
            floor_axis('z', position.z)?,
        ))
    }

    /// Chunk-grid coordinate of the chunk containing a continuous world position.
    pub fn chunk_containing(&self, position: Point3<f32>) -> CoordinateResult<Point3<i32>> {
        Ok(self.chunk_of(Self::voxel_at(position)?))
    }

    /// Converts a render-space position (as seen by the camera) to the voxel it is inside.
    pub fn render_to_world(position: Point3<f32>) -> CoordinateResult<Point3<i32>> {
        let half = CUBE_EDGE_LENGTH / 2.0;
        Self::voxel_at(Point3::new(
            position.x / CUBE_EDGE_LENGTH + half / CUBE_EDGE_LENGTH,
            position.y / CUBE_EDGE_LENGTH + half / CUBE_EDGE_LENGTH,
            position.z / CUBE_EDGE_LENGTH + half / CUBE_EDGE_LENGTH,
        ))
    }
}

fn floor_axis(axis: char, value: f32) -> CoordinateResult<i32> {
    if !value.is_finite() {
        return Err(CoordinateError::NonFinite { axis, value });
    }
    let floored = value.floor();
    if floored < i32::MIN as f32 || floored >= i32::MAX as f32 {
        return Err(CoordinateError::OutOfRange { axis, value });
    }
    Ok(floored as i32)
}
