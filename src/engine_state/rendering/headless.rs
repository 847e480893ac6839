//! # Headless Backend
//!
//! An in-memory [`GraphicsBackend`] that keeps buffer contents on the CPU and
//! records every draw. It backs the demo loop and lets the meshing, rendering
//! and eviction paths be tested without a GPU.
//!
//! Like a real driver it tracks per-buffer usage analytics, rejects operations
//! on unknown handles, and refuses to link programs whose stages have no entry
//! point.

use std::collections::HashMap;

use cgmath::Matrix4;
use log::{debug, error};

use super::{
    BufferHandle, BufferTarget, BufferUsage, GraphicsBackend, MatrixUniform, ProgramHandle,
    RenderMode, ShaderStage, VertexAttribute,
};
use crate::error::{GraphicsBackendError, GraphicsResult};

/// Analytics data for a buffer
///
/// Tracks memory use and write operations so tests and the demo loop can see
/// how much geometry is resident.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Largest size the buffer has held, in bytes
    pub allocated_memory: u64,
    /// Size of the most recent upload, in bytes
    pub used_memory: u64,
    /// Number of uploads
    pub times_written: u64,
}

#[derive(Debug)]
struct HeadlessBuffer {
    target: BufferTarget,
    usage: BufferUsage,
    contents: Vec<u8>,
    analytics: BufferAnalytics,
}

#[derive(Debug, Default)]
struct HeadlessProgram {
    uniforms: HashMap<MatrixUniform, Matrix4<f32>>,
}

/// One recorded `draw_triangles` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub slot: u32,
    pub vertex_count: u32,
    pub mode: RenderMode,
    pub program: ProgramHandle,
    /// Buffers bound to each attribute location at draw time, sorted by location
    pub attributes: Vec<(u32, BufferHandle)>,
    /// The program's `model` matrix at draw time
    pub model: Option<Matrix4<f32>>,
}

/// CPU-side graphics backend.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_buffer: u32,
    next_program: u32,
    buffers: HashMap<BufferHandle, HeadlessBuffer>,
    programs: HashMap<ProgramHandle, HeadlessProgram>,
    bound_buffer: Option<BufferHandle>,
    active_program: Option<ProgramHandle>,
    attributes: HashMap<u32, BufferHandle>,
    draw_calls: Vec<DrawCall>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a buffer, if it exists.
    pub fn buffer_contents(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&handle).map(|buffer| buffer.contents.as_slice())
    }

    pub fn buffer_analytics(&self, handle: BufferHandle) -> Option<&BufferAnalytics> {
        self.buffers.get(&handle).map(|buffer| &buffer.analytics)
    }

    /// Target and usage a buffer was created with.
    pub fn buffer_kind(&self, handle: BufferHandle) -> Option<(BufferTarget, BufferUsage)> {
        self.buffers
            .get(&handle)
            .map(|buffer| (buffer.target, buffer.usage))
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Sum of the allocated size of every live buffer.
    pub fn total_allocated_memory(&self) -> u64 {
        self.buffers
            .values()
            .map(|buffer| buffer.analytics.allocated_memory)
            .sum()
    }

    /// Sum of the bytes currently stored in every live buffer.
    pub fn total_used_memory(&self) -> u64 {
        self.buffers
            .values()
            .map(|buffer| buffer.analytics.used_memory)
            .sum()
    }

    /// Draw calls recorded since the last [`take_draw_calls`](Self::take_draw_calls).
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Drains the recorded draw calls, typically once per frame.
    pub fn take_draw_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draw_calls)
    }

    /// Last value written to a program's matrix uniform.
    pub fn uniform(&self, program: ProgramHandle, uniform: MatrixUniform) -> Option<Matrix4<f32>> {
        self.programs
            .get(&program)
            .and_then(|program| program.uniforms.get(&uniform).copied())
    }

    fn buffer_mut(&mut self, handle: BufferHandle) -> GraphicsResult<&mut HeadlessBuffer> {
        self.buffers
            .get_mut(&handle)
            .ok_or(GraphicsBackendError::UnknownBuffer(handle.0))
    }

    fn check_stage(stage: ShaderStage, source: &str) -> GraphicsResult<()> {
        if source.trim().is_empty() {
            return Err(GraphicsBackendError::ShaderCompilation {
                stage,
                log: "0:0: error: empty shader source".to_owned(),
            });
        }
        if !source.contains("void main") {
            return Err(GraphicsBackendError::ShaderCompilation {
                stage,
                log: "0:0: error: missing entry point 'void main()'".to_owned(),
            });
        }
        Ok(())
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn create_buffer(
        &mut self,
        target: BufferTarget,
        usage: BufferUsage,
    ) -> GraphicsResult<BufferHandle> {
        self.next_buffer = self.next_buffer.checked_add(1).ok_or_else(|| {
            GraphicsBackendError::BufferCreation("buffer handle space exhausted".to_owned())
        })?;
        let handle = BufferHandle(self.next_buffer);
        self.buffers.insert(
            handle,
            HeadlessBuffer {
                target,
                usage,
                contents: Vec::new(),
                analytics: BufferAnalytics::default(),
            },
        );
        Ok(handle)
    }

    fn upload(&mut self, handle: BufferHandle, bytes: &[u8]) -> GraphicsResult<()> {
        let buffer = self.buffer_mut(handle)?;
        buffer.contents.clear();
        buffer.contents.extend_from_slice(bytes);

        let size = bytes.len() as u64;
        let analytics = &mut buffer.analytics;
        analytics.allocated_memory = analytics.allocated_memory.max(size);
        analytics.used_memory = size;
        analytics.times_written += 1;
        Ok(())
    }

    fn bind(&mut self, handle: BufferHandle) -> GraphicsResult<()> {
        if !self.buffers.contains_key(&handle) {
            return Err(GraphicsBackendError::UnknownBuffer(handle.0));
        }
        self.bound_buffer = Some(handle);
        Ok(())
    }

    fn set_vertex_layout(&mut self, attribute: VertexAttribute) -> GraphicsResult<()> {
        let bound = self
            .bound_buffer
            .ok_or(GraphicsBackendError::UnknownBuffer(0))?;
        self.attributes.insert(attribute.location, bound);
        Ok(())
    }

    fn draw_triangles(
        &mut self,
        slot: u32,
        vertex_count: u32,
        mode: RenderMode,
    ) -> GraphicsResult<()> {
        let program = self
            .active_program
            .ok_or(GraphicsBackendError::NoActiveProgram)?;
        for handle in self.attributes.values() {
            if !self.buffers.contains_key(handle) {
                return Err(GraphicsBackendError::UnknownBuffer(handle.0));
            }
        }

        let mut attributes: Vec<(u32, BufferHandle)> = self
            .attributes
            .iter()
            .map(|(location, handle)| (*location, *handle))
            .collect();
        attributes.sort_unstable();

        self.draw_calls.push(DrawCall {
            slot,
            vertex_count,
            mode,
            program,
            attributes,
            model: self.uniform(program, MatrixUniform::Model),
        });
        Ok(())
    }

    fn release_buffer(&mut self, handle: BufferHandle) {
        if self.buffers.remove(&handle).is_some() {
            debug!("Released buffer {}", handle.0);
        }
        if self.bound_buffer == Some(handle) {
            self.bound_buffer = None;
        }
        self.attributes.retain(|_, bound| *bound != handle);
    }

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> GraphicsResult<ProgramHandle> {
        Self::check_stage(ShaderStage::Vertex, vertex_source)?;
        Self::check_stage(ShaderStage::Fragment, fragment_source)?;

        // Every uniform the program exposes must be declared by one of the stages.
        let missing: Vec<&str> = [MatrixUniform::Model, MatrixUniform::View, MatrixUniform::Projection]
            .into_iter()
            .map(MatrixUniform::name)
            .filter(|name| !vertex_source.contains(name) && !fragment_source.contains(name))
            .collect();
        if !missing.is_empty() {
            let log = format!("undeclared uniforms: {}", missing.join(", "));
            error!("Program link failed: {log}");
            return Err(GraphicsBackendError::ProgramLink { log });
        }

        self.next_program += 1;
        let handle = ProgramHandle(self.next_program);
        self.programs.insert(handle, HeadlessProgram::default());
        Ok(handle)
    }

    fn use_program(&mut self, program: ProgramHandle) -> GraphicsResult<()> {
        if !self.programs.contains_key(&program) {
            return Err(GraphicsBackendError::UnknownProgram(program.0));
        }
        self.active_program = Some(program);
        Ok(())
    }

    fn set_matrix(
        &mut self,
        program: ProgramHandle,
        uniform: MatrixUniform,
        value: &Matrix4<f32>,
    ) -> GraphicsResult<()> {
        let program = self
            .programs
            .get_mut(&program)
            .ok_or(GraphicsBackendError::UnknownProgram(program.0))?;
        program.uniforms.insert(uniform, *value);
        Ok(())
    }
}
