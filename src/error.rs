//! # Error Types
//!
//! Error enums for every layer of the crate. Each layer gets its own enum and
//! `Result` alias; the outer layers wrap the inner ones with `#[from]` so `?`
//! carries failures upward without manual mapping.
//!
//! Querying an unloaded chunk is deliberately *not* an error: the world hands
//! back the `core:out_of_bounds` sentinel block instead.

use cgmath::Point3;
use thiserror::Error;

use crate::engine_state::rendering::ShaderStage;

/// Failures raised by a single chunk.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// The chunk was queried or mutated before its voxels were populated.
    #[error("chunk at origin {origin:?} was accessed before it was populated")]
    UninitializedChunk { origin: Point3<i32> },

    /// A local coordinate fell outside `[0, size)` on some axis.
    #[error("local coordinate {local:?} is outside a chunk of size {size}")]
    OutOfRange { local: Point3<usize>, size: u32 },

    /// `populate` was called on a chunk that already holds voxel data.
    #[error("chunk at origin {origin:?} is already populated")]
    AlreadyPopulated { origin: Point3<i32> },

    /// A generator (or a raw grid) produced the wrong number of voxels.
    #[error("voxel grid holds {actual} blocks, expected {expected}")]
    GridSizeMismatch { expected: usize, actual: usize },
}

/// Failures while translating positions between world, chunk and local space.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("{axis} coordinate {value} is not finite")]
    NonFinite { axis: char, value: f32 },

    #[error("{axis} coordinate {value} does not fit the voxel grid")]
    OutOfRange { axis: char, value: f32 },

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("chunk size {0} does not fit the voxel grid")]
    ChunkSizeTooLarge(u32),
}

/// Failures reported by a [`GraphicsBackend`](crate::engine_state::rendering::GraphicsBackend).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphicsBackendError {
    #[error("failed to create buffer: {0}")]
    BufferCreation(String),

    #[error("buffer {0} does not exist")]
    UnknownBuffer(u32),

    #[error("program {0} does not exist")]
    UnknownProgram(u32),

    #[error("draw issued without an active program")]
    NoActiveProgram,

    #[error("{stage:?} shader failed to compile:\n{log}")]
    ShaderCompilation { stage: ShaderStage, log: String },

    #[error("program failed to link:\n{log}")]
    ProgramLink { log: String },

    #[error("mesh of {0} vertices exceeds the drawable vertex range")]
    TooManyVertices(usize),
}

/// Failures surfaced by the [`ChunkManager`](crate::engine_state::voxels::chunk_manager::ChunkManager).
#[derive(Debug, Error)]
pub enum WorldError {
    /// An edit targeted a chunk that is not loaded and the manager is
    /// configured to reject such edits.
    #[error("no chunk is loaded at origin {origin:?}")]
    ChunkNotLoaded { origin: Point3<i32> },

    #[error(transparent)]
    Chunk(#[from] ChunkError),

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error(transparent)]
    Graphics(#[from] GraphicsBackendError),

    /// The world was built from a config it cannot stream.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures while loading or validating a [`WorldConfig`](crate::config::WorldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top level error for engine startup and the frame loop.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Graphics(#[from] GraphicsBackendError),
}

pub type ChunkResult<T> = Result<T, ChunkError>;
pub type CoordinateResult<T> = Result<T, CoordinateError>;
pub type GraphicsResult<T> = Result<T, GraphicsBackendError>;
pub type WorldResult<T> = Result<T, WorldError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type EngineResult<T> = Result<T, EngineError>;
