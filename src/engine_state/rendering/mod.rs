//! Rendering seam for the voxel engine.
//!
//! The engine never talks to a GPU API directly. Everything it needs from the
//! graphics layer goes through the [`GraphicsBackend`] trait: opaque buffer
//! objects that can be created, filled, bound and drawn from, plus shader
//! programs with `model`/`view`/`projection` matrix uniforms.
//!
//! # Architecture
//! - [`GraphicsBackend`]: the contract a concrete graphics API implements
//! - [`headless::HeadlessBackend`]: in-memory implementation used by the demo loop and tests
//! - [`meshing`]: converts chunk voxels into flat vertex/UV arrays
//! - [`shader::ChunkProgram`]: the chunk shader program and its camera uniforms
//! - [`vertex`]: GPU-facing vertex attribute types
//!
//! Render state such as wireframe mode is passed explicitly with every draw as a
//! [`RenderMode`] instead of living as hidden global state inside the backend.

use cgmath::Matrix4;

use crate::error::GraphicsResult;

pub mod headless;
pub mod meshing;
pub mod shader;
pub mod vertex;

/// Opaque identifier of a buffer owned by a [`GraphicsBackend`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// Opaque identifier of a linked shader program owned by a [`GraphicsBackend`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

/// What a buffer will be bound as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data
    Array,
    /// Index data
    ElementArray,
    /// Uniform block data
    Uniform,
}

/// Expected update frequency of a buffer's contents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Written once, drawn many times
    StaticDraw,
    /// Rewritten occasionally, e.g. after a block edit
    DynamicDraw,
    /// Rewritten every frame
    StreamDraw,
}

/// Polygon fill mode for a draw.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    #[default]
    Fill,
    Wireframe,
}

impl RenderMode {
    /// The opposite mode.
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Fill => RenderMode::Wireframe,
            RenderMode::Wireframe => RenderMode::Fill,
        }
    }
}

/// The matrix uniforms every chunk program exposes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatrixUniform {
    Model,
    View,
    Projection,
}

impl MatrixUniform {
    /// Name of the uniform in shader source.
    pub fn name(self) -> &'static str {
        match self {
            MatrixUniform::Model => "model",
            MatrixUniform::View => "view",
            MatrixUniform::Projection => "projection",
        }
    }
}

/// Shader pipeline stage, used to attribute compile diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Describes how one vertex attribute is read from the currently bound buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Shader input location
    pub location: u32,
    /// Number of `f32` components
    pub components: u32,
    /// Bytes between consecutive elements
    pub stride: u32,
    /// Byte offset of the first element
    pub offset: u32,
}

/// Everything the engine needs from a graphics API.
///
/// All methods must be called from the thread that owns the graphics context.
/// Implementations report failures as [`GraphicsBackendError`](crate::error::GraphicsBackendError)
/// rather than panicking.
pub trait GraphicsBackend {
    /// Creates an empty buffer.
    fn create_buffer(&mut self, target: BufferTarget, usage: BufferUsage)
        -> GraphicsResult<BufferHandle>;

    /// Replaces the whole contents of a buffer.
    fn upload(&mut self, handle: BufferHandle, bytes: &[u8]) -> GraphicsResult<()>;

    /// Makes `handle` the buffer subsequent layout and draw calls read from.
    fn bind(&mut self, handle: BufferHandle) -> GraphicsResult<()>;

    /// Binds an attribute of the active program to the currently bound buffer.
    fn set_vertex_layout(&mut self, attribute: VertexAttribute) -> GraphicsResult<()>;

    /// Draws `vertex_count` vertices as a triangle list into draw slot `slot`.
    fn draw_triangles(&mut self, slot: u32, vertex_count: u32, mode: RenderMode)
        -> GraphicsResult<()>;

    /// Frees a buffer. Releasing an unknown handle is a no-op.
    fn release_buffer(&mut self, handle: BufferHandle);

    /// Compiles both stages and links them into a program.
    fn compile_program(&mut self, vertex_source: &str, fragment_source: &str)
        -> GraphicsResult<ProgramHandle>;

    /// Makes `program` the active program for subsequent draws.
    fn use_program(&mut self, program: ProgramHandle) -> GraphicsResult<()>;

    /// Sets one of the matrix uniforms of `program`.
    fn set_matrix(
        &mut self,
        program: ProgramHandle,
        uniform: MatrixUniform,
        value: &Matrix4<f32>,
    ) -> GraphicsResult<()>;
}
