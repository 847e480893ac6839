//! The fixed cube template every voxel is meshed from.
//!
//! The cube is centred on the origin with an edge length of 2, so its corners
//! sit at ±1 on every axis. Faces are emitted in [`BlockSide`] order, each as two
//! triangles sharing a diagonal.

use crate::engine_state::{
    rendering::vertex::{Position, TexCoord},
    voxels::block::block_side::BlockSide,
};

/// Number of vertices emitted per face.
pub const VERTICES_PER_FACE: usize = 6;

const fn p(x: f32, y: f32, z: f32) -> Position {
    Position::new(x, y, z)
}

const fn t(u: f32, v: f32) -> TexCoord {
    TexCoord::new(u, v)
}

/// Corner positions of each face, indexed by `BlockSide as usize`.
pub const CUBE_FACES: [[Position; VERTICES_PER_FACE]; 6] = [
    // FRONT (-Z)
    [
        p(-1.0, -1.0, -1.0),
        p(1.0, -1.0, -1.0),
        p(1.0, 1.0, -1.0),
        p(1.0, 1.0, -1.0),
        p(-1.0, 1.0, -1.0),
        p(-1.0, -1.0, -1.0),
    ],
    // BACK (+Z)
    [
        p(-1.0, -1.0, 1.0),
        p(1.0, -1.0, 1.0),
        p(1.0, 1.0, 1.0),
        p(1.0, 1.0, 1.0),
        p(-1.0, 1.0, 1.0),
        p(-1.0, -1.0, 1.0),
    ],
    // LEFT (-X)
    [
        p(-1.0, 1.0, 1.0),
        p(-1.0, 1.0, -1.0),
        p(-1.0, -1.0, -1.0),
        p(-1.0, -1.0, -1.0),
        p(-1.0, -1.0, 1.0),
        p(-1.0, 1.0, 1.0),
    ],
    // RIGHT (+X)
    [
        p(1.0, 1.0, 1.0),
        p(1.0, 1.0, -1.0),
        p(1.0, -1.0, -1.0),
        p(1.0, -1.0, -1.0),
        p(1.0, -1.0, 1.0),
        p(1.0, 1.0, 1.0),
    ],
    // BOTTOM (-Y)
    [
        p(-1.0, -1.0, -1.0),
        p(1.0, -1.0, -1.0),
        p(1.0, -1.0, 1.0),
        p(1.0, -1.0, 1.0),
        p(-1.0, -1.0, 1.0),
        p(-1.0, -1.0, -1.0),
    ],
    // TOP (+Y)
    [
        p(-1.0, 1.0, -1.0),
        p(1.0, 1.0, -1.0),
        p(1.0, 1.0, 1.0),
        p(1.0, 1.0, 1.0),
        p(-1.0, 1.0, 1.0),
        p(-1.0, 1.0, -1.0),
    ],
];

const SIDE_UVS: [TexCoord; VERTICES_PER_FACE] = [
    t(0.0, 0.0),
    t(1.0, 0.0),
    t(1.0, 1.0),
    t(1.0, 1.0),
    t(0.0, 1.0),
    t(0.0, 0.0),
];

const WALL_UVS: [TexCoord; VERTICES_PER_FACE] = [
    t(1.0, 0.0),
    t(1.0, 1.0),
    t(0.0, 1.0),
    t(0.0, 1.0),
    t(0.0, 0.0),
    t(1.0, 0.0),
];

const CAP_UVS: [TexCoord; VERTICES_PER_FACE] = [
    t(0.0, 1.0),
    t(1.0, 1.0),
    t(1.0, 0.0),
    t(1.0, 0.0),
    t(0.0, 0.0),
    t(0.0, 1.0),
];

/// Texture coordinates of each face, indexed by `BlockSide as usize`.
pub const CUBE_FACE_UVS: [[TexCoord; VERTICES_PER_FACE]; 6] =
    [SIDE_UVS, SIDE_UVS, WALL_UVS, WALL_UVS, CAP_UVS, CAP_UVS];

/// Template positions of one face.
pub fn face_positions(side: BlockSide) -> &'static [Position; VERTICES_PER_FACE] {
    &CUBE_FACES[side as usize]
}

/// Template texture coordinates of one face.
pub fn face_uvs(side: BlockSide) -> &'static [TexCoord; VERTICES_PER_FACE] {
    &CUBE_FACE_UVS[side as usize]
}
