//! # Block Side Module
//!
//! This module defines the six faces of a voxel cube in the order the mesher
//! emits them.

/// Represents the six faces of a voxel cube.
///
/// Each variant's discriminant is its index within a cube's 36 emitted vertices
/// divided by 6, so face `FRONT` occupies vertices `0..6`, `BACK` `6..12` and so on.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing negative Z)
    FRONT = 0,

    /// The back face (facing positive Z)
    BACK = 1,

    /// The left face (facing negative X)
    LEFT = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The bottom face (facing negative Y)
    BOTTOM = 4,

    /// The top face (facing positive Y)
    TOP = 5,
}

impl BlockSide {
    /// Returns all six faces in emission order:
    /// [FRONT, BACK, LEFT, RIGHT, BOTTOM, TOP]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::BOTTOM,
            BlockSide::TOP,
        ]
    }

    /// Outward unit normal of the face.
    pub fn normal(self) -> [i32; 3] {
        match self {
            BlockSide::FRONT => [0, 0, -1],
            BlockSide::BACK => [0, 0, 1],
            BlockSide::LEFT => [-1, 0, 0],
            BlockSide::RIGHT => [1, 0, 0],
            BlockSide::BOTTOM => [0, -1, 0],
            BlockSide::TOP => [0, 1, 0],
        }
    }
}
