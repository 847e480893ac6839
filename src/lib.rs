#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A streaming, editable voxel world split into cubic chunks, with a mesher
//! that turns chunk voxels into triangle geometry for a pluggable graphics
//! backend.
//!
//! ## Key Modules
//!
//! * `config` - JSON world configuration
//! * `engine_state` - The frame loop, rendering seam, task system and voxel world
//! * `error` - Error types for every layer
//!
//! ## Usage
//!
//! ```
//! use cgmath::Point3;
//! use voxel_world::{BlockInstance, ChunkManager, WorldConfig};
//!
//! let mut world = ChunkManager::new(&WorldConfig::default()).unwrap();
//! world.determine_generation(Point3::new(0.0, 0.0, 0.0)).unwrap();
//!
//! let position = Point3::new(-1, 3, 7);
//! world.place_block_at(position, BlockInstance::new("core:wood")).unwrap();
//! assert_eq!(world.get_block_at(position).unwrap().id(), "core:wood");
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunk lookup is a single hash map access per block query
//! * Every voxel is meshed as a full cube; no face culling is done
//! * Chunk generation can run on a pool of worker threads

use cgmath::{Deg, Matrix4, Point3, Vector3};
use log::info;

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::{EvictionConfig, GenerationMode, UnloadedEditPolicy, WorldConfig};
pub use engine_state::{
    rendering::{
        headless::HeadlessBackend,
        meshing::{ChunkMesh, Mesher},
        shader::ChunkProgram,
        GraphicsBackend, RenderMode,
    },
    task_management::TaskManager,
    voxels::{
        block::BlockInstance,
        chunk::{chunk_creation::ChunkGridBuilder, Chunk},
        chunk_manager::ChunkManager,
        coords::{ChunkLocation, CoordinateMapper},
        generation::{GeneratorKind, TerrainGenerator},
    },
    EngineState, FrameStats,
};
pub use error::{EngineError, EngineResult, WorldError, WorldResult};

/// Frames the headless demo runs for.
const DEMO_FRAMES: u32 = 120;
/// Render-space distance the demo camera moves per frame.
const DEMO_CAMERA_STEP: f32 = 1.5;

/// Runs a headless demo: streams the world around a camera walking along +X,
/// editing the block under it every so often, and logs per-frame stats.
///
/// Reads the world config from the file named by `VOXEL_WORLD_CONFIG`, or
/// uses the defaults.
pub fn run() -> EngineResult<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = WorldConfig::from_env()?;
    let mut engine = EngineState::new(&config, HeadlessBackend::new())?;
    let projection = cgmath::perspective(Deg(45.0), 16.0 / 9.0, 0.1, 1000.0);

    for frame in 0..DEMO_FRAMES {
        let camera = Point3::new(frame as f32 * DEMO_CAMERA_STEP, 8.0, 0.0);
        let view = Matrix4::look_to_rh(camera, Vector3::unit_x(), Vector3::unit_y());
        engine.set_camera(view, projection);

        let voxel = CoordinateMapper::render_to_world(camera).map_err(WorldError::from)?;
        let stats = engine.tick(Point3::new(voxel.x as f32, voxel.y as f32, voxel.z as f32))?;
        engine.backend_mut().take_draw_calls();

        if frame % 30 == 0 {
            let below = Point3::new(voxel.x, voxel.y - 1, voxel.z);
            let world = engine.world_mut();
            if let Some(previous) = world.place_block_at(below, BlockInstance::new("core:wood"))? {
                info!("Placed wood at {below:?}, replacing {previous}");
            }
            if frame % 60 == 0 {
                world.toggle_wireframe();
            }
        }

        if stats.frame % 30 == 0 {
            info!("{stats}");
        }
    }

    let backend = engine.backend();
    info!(
        "Demo finished: {} chunks resident, {} buffers, {} bytes allocated, {} bytes used",
        engine.world().chunk_count(),
        backend.live_buffer_count(),
        backend.total_allocated_memory(),
        backend.total_used_memory()
    );
    Ok(())
}
