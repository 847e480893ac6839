//! The chunk shader program.
//!
//! Chunks are drawn with a single program taking a position attribute at
//! location 0 and a texture coordinate at location 1, plus the usual
//! `model`/`view`/`projection` matrices.

use cgmath::Matrix4;
use log::{error, info};

use super::{GraphicsBackend, MatrixUniform, ProgramHandle};
use crate::error::GraphicsResult;

pub const VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 a_position;
layout (location = 1) in vec2 a_tex_coord;

out vec2 v_tex_coord;

uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;

void main() {
    gl_Position = projection * view * model * vec4(a_position, 1.0);
    v_tex_coord = a_tex_coord;
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 v_tex_coord;
out vec4 frag_color;

uniform sampler2D block_texture;

void main() {
    frag_color = texture(block_texture, v_tex_coord);
}
"#;

/// A linked chunk program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkProgram {
    handle: ProgramHandle,
}

impl ChunkProgram {
    /// Compiles and links the built-in chunk shaders.
    ///
    /// # Errors
    /// Compilation or link failures are logged with the backend's diagnostic and
    /// returned; there is no fallback program.
    pub fn compile(backend: &mut impl GraphicsBackend) -> GraphicsResult<Self> {
        Self::compile_from(backend, VERTEX_SHADER, FRAGMENT_SHADER)
    }

    /// Compiles and links a program from custom sources.
    pub fn compile_from(
        backend: &mut impl GraphicsBackend,
        vertex_source: &str,
        fragment_source: &str,
    ) -> GraphicsResult<Self> {
        match backend.compile_program(vertex_source, fragment_source) {
            Ok(handle) => {
                info!("Linked chunk program {}", handle.0);
                Ok(ChunkProgram { handle })
            }
            Err(e) => {
                error!("Failed to build chunk program: {e}");
                Err(e)
            }
        }
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Activates the program and uploads the camera matrices.
    pub fn bind_camera(
        &self,
        backend: &mut impl GraphicsBackend,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> GraphicsResult<()> {
        backend.use_program(self.handle)?;
        backend.set_matrix(self.handle, MatrixUniform::View, view)?;
        backend.set_matrix(self.handle, MatrixUniform::Projection, projection)
    }
}
