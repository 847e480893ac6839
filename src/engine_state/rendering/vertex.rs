//! Vertex data structures and layouts for chunk rendering.
//!
//! Chunk meshes are stored as two parallel arrays, one of positions and one of
//! texture coordinates, and are uploaded to two separate buffers. Both element
//! types are plain `#[repr(C)]` structs so they can be reinterpreted as bytes
//! with `bytemuck` without copying.

use cgmath::{Point3, Vector3};

use super::VertexAttribute;

/// A vertex position in render space.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Position { x, y, z }
    }

    /// Returns this position moved by `offset`.
    pub fn translated(self, offset: Vector3<f32>) -> Self {
        Position {
            x: self.x + offset.x,
            y: self.y + offset.y,
            z: self.z + offset.z,
        }
    }

    /// Layout of the position attribute (shader location 0).
    pub const fn attribute() -> VertexAttribute {
        VertexAttribute {
            location: 0,
            components: 3,
            stride: std::mem::size_of::<Position>() as u32,
            offset: 0,
        }
    }
}

impl From<Position> for Point3<f32> {
    fn from(position: Position) -> Self {
        Point3::new(position.x, position.y, position.z)
    }
}

/// A texture coordinate, normalized to `0.0..=1.0` across one cube face.
///
/// # Memory Layout
/// - UV: 2x f32 (8 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
}

impl TexCoord {
    pub const fn new(u: f32, v: f32) -> Self {
        TexCoord { u, v }
    }

    /// Layout of the texture coordinate attribute (shader location 1).
    pub const fn attribute() -> VertexAttribute {
        VertexAttribute {
            location: 1,
            components: 2,
            stride: std::mem::size_of::<TexCoord>() as u32,
            offset: 0,
        }
    }
}
