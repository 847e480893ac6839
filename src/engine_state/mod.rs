//! # Engine State Module
//!
//! The frame-level coordinator of the voxel engine.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world, the graphics backend and the chunk program
//! * `rendering` - The graphics backend seam, the mesher and the chunk shader
//! * `task_management` - Worker pool for background chunk generation
//! * `voxels` - Voxel data, chunks, streaming and edits
//!
//! ## Frame
//!
//! Each [`EngineState::tick`] runs, in order:
//! 1. Streaming: generate the chunks the viewpoint needs, inline or by
//!    publishing generation tasks and applying finished ones
//! 2. Eviction of chunks that are no longer needed
//! 3. Rendering: upload camera matrices, re-mesh dirty chunks and draw

use std::{collections::HashSet, fmt};

use cgmath::{Matrix4, Point3, SquareMatrix};
use log::{debug, info};
use web_time::{Duration, Instant};

use crate::{
    config::{GenerationMode, WorldConfig},
    error::{EngineResult, WorldResult},
};
use rendering::{shader::ChunkProgram, GraphicsBackend};
use task_management::TaskManager;
use voxels::{chunk_manager::ChunkManager, tasks::chunk_generation_task::ChunkGenerationTask};

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// What happened during one [`EngineState::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    /// Chunks that became resident this frame
    pub generated: usize,
    pub evicted: usize,
    /// Chunks loaded after eviction
    pub resident: usize,
    /// Draw slots used
    pub drawn: u32,
    /// Chunks queued or running on workers
    pub pending: usize,
    pub elapsed: Duration,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {}: +{} -{} chunks, {} resident, {} drawn, {} pending ({:.2?})",
            self.frame,
            self.generated,
            self.evicted,
            self.resident,
            self.drawn,
            self.pending,
            self.elapsed
        )
    }
}

/// The main state container for the voxel engine
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_world::{EngineState, HeadlessBackend, WorldConfig};
///
/// let config = WorldConfig { chunk_size: 8, view_distance: 8, ..WorldConfig::default() };
/// let mut engine = EngineState::new(&config, HeadlessBackend::new()).unwrap();
///
/// let stats = engine.tick(Point3::new(0.0, 0.0, 0.0)).unwrap();
/// assert_eq!(stats.resident, 27);
/// ```
pub struct EngineState<B: GraphicsBackend> {
    world: ChunkManager,
    backend: B,
    program: ChunkProgram,
    /// Present in background generation mode
    task_manager: Option<TaskManager>,
    /// Chunks handed to the task manager and not yet applied
    pending: HashSet<Point3<i32>>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    frame: u64,
}

impl<B: GraphicsBackend> EngineState<B> {
    /// Validates `config`, creates the world and compiles the chunk program.
    ///
    /// # Errors
    /// An invalid config or a failed shader build; both are fatal.
    pub fn new(config: &WorldConfig, mut backend: B) -> EngineResult<Self> {
        config.validate()?;
        let world = ChunkManager::new(config)?;
        let program = ChunkProgram::compile(&mut backend)?;
        let task_manager = match config.generation {
            GenerationMode::Synchronous => None,
            GenerationMode::Background { workers } => Some(TaskManager::new(workers)),
        };
        info!(
            "Engine ready: chunk size {}, view radius {} chunks, {:?} generation",
            world.chunk_size(),
            world.view_radius(),
            config.generation
        );

        Ok(EngineState {
            world,
            backend,
            program,
            task_manager,
            pending: HashSet::new(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            frame: 0,
        })
    }

    pub fn world(&self) -> &ChunkManager {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ChunkManager {
        &mut self.world
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn program(&self) -> &ChunkProgram {
        &self.program
    }

    /// Chunks waiting on background generation.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Sets the camera matrices used from the next tick on.
    pub fn set_camera(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>) {
        self.view = view;
        self.projection = projection;
    }

    /// Runs one frame for a viewpoint in world voxel space.
    pub fn tick(&mut self, viewpoint: Point3<f32>) -> EngineResult<FrameStats> {
        let started = Instant::now();
        self.frame += 1;

        let generated = self.stream(viewpoint)?;
        let evicted = self.world.unload_redundant();

        self.program
            .bind_camera(&mut self.backend, &self.view, &self.projection)?;
        let drawn = self.world.render(&mut self.backend, &self.program, 0)?;

        let stats = FrameStats {
            frame: self.frame,
            generated,
            evicted: evicted.len(),
            resident: self.world.chunk_count(),
            drawn,
            pending: self.pending.len(),
            elapsed: started.elapsed(),
        };
        if stats.generated > 0 || stats.evicted > 0 {
            info!("{stats}");
        } else {
            debug!("{stats}");
        }
        Ok(stats)
    }

    /// Brings the resident set in line with `viewpoint`. Returns how many
    /// chunks became resident.
    fn stream(&mut self, viewpoint: Point3<f32>) -> WorldResult<usize> {
        let Some(task_manager) = self.task_manager.as_mut() else {
            return self.world.determine_generation(viewpoint);
        };

        let before = self.world.chunk_count();
        for chunk in task_manager.process_completed_tasks(&mut self.world) {
            self.pending.remove(&chunk);
        }
        let generated = self.world.chunk_count() - before;

        let missing = self.world.missing_chunks(viewpoint)?;

        let world = &self.world;
        let cancelled = task_manager
            .cancel_queued(|task| task.target().is_some_and(|chunk| !world.is_in_view(chunk)));
        for chunk in cancelled {
            self.pending.remove(&chunk);
        }

        for chunk in missing {
            if self.pending.insert(chunk) {
                task_manager.publish_task(Box::new(ChunkGenerationTask::for_world(&self.world, chunk)));
            }
        }
        task_manager.process_queued_tasks();
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{
        engine_state::{
            rendering::{headless::HeadlessBackend, MatrixUniform},
            voxels::{block::BlockInstance, generation::GeneratorKind},
        },
        error::EngineError,
    };

    fn config(generation: GenerationMode) -> WorldConfig {
        WorldConfig {
            chunk_size: 4,
            view_distance: 4,
            generator: GeneratorKind::Checkerboard {
                block: "core:stone".to_owned(),
            },
            generation,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn synchronous_tick_streams_and_draws() {
        let mut engine =
            EngineState::new(&config(GenerationMode::Synchronous), HeadlessBackend::new()).unwrap();
        let stats = engine.tick(Point3::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(stats.generated, 27);
        assert_eq!(stats.drawn, 27);
        assert_eq!(stats.pending, 0);

        let stats = engine.tick(Point3::new(5.0, 1.0, 1.0)).unwrap();
        assert_eq!(stats.generated, 9);
        assert_eq!(stats.evicted, 9);
        assert_eq!(stats.resident, 27);
        assert_eq!(engine.backend().live_buffer_count(), 27 * 2);
    }

    #[test]
    fn camera_matrices_reach_the_program() {
        let mut engine =
            EngineState::new(&config(GenerationMode::Synchronous), HeadlessBackend::new()).unwrap();
        let view = Matrix4::from_scale(2.0);
        engine.set_camera(view, Matrix4::identity());
        engine.tick(Point3::new(0.0, 0.0, 0.0)).unwrap();

        let program = engine.program().handle();
        assert_eq!(engine.backend().uniform(program, MatrixUniform::View), Some(view));
    }

    #[test]
    fn edits_show_up_in_the_next_upload() {
        let mut engine =
            EngineState::new(&config(GenerationMode::Synchronous), HeadlessBackend::new()).unwrap();
        engine.tick(Point3::new(0.0, 0.0, 0.0)).unwrap();

        let chunk = Point3::new(0, 0, 0);
        let buffers = engine.world().chunk(chunk).unwrap().buffers().unwrap();
        engine
            .world_mut()
            .place_block_at(Point3::new(1, 0, 0), BlockInstance::new("core:wood"))
            .unwrap();
        assert!(engine.world().chunk(chunk).unwrap().is_dirty());

        engine.tick(Point3::new(0.0, 0.0, 0.0)).unwrap();
        assert!(!engine.world().chunk(chunk).unwrap().is_dirty());
        let analytics = engine.backend().buffer_analytics(buffers.positions).unwrap();
        assert_eq!(analytics.times_written, 2);
    }

    #[test]
    fn background_generation_eventually_fills_the_view() {
        let mut engine = EngineState::new(
            &config(GenerationMode::Background { workers: 2 }),
            HeadlessBackend::new(),
        )
        .unwrap();

        let first = engine.tick(Point3::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(first.generated, 0);
        assert_eq!(first.pending, 27);

        let mut resident = 0;
        for _ in 0..1000 {
            let stats = engine.tick(Point3::new(0.0, 0.0, 0.0)).unwrap();
            resident = stats.resident;
            if stats.pending == 0 {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(2));
        }
        assert_eq!(resident, 27);
        assert_eq!(engine.pending_count(), 0);
    }

    #[test]
    fn moving_away_cancels_queued_generation() {
        let mut engine = EngineState::new(
            &config(GenerationMode::Background { workers: 1 }),
            HeadlessBackend::new(),
        )
        .unwrap();

        let first = engine.tick(Point3::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(first.pending, 27);

        // Only the task already on the worker can survive the jump.
        let far = Point3::new(10_000.0, 0.0, 0.0);
        let second = engine.tick(far).unwrap();
        assert!((27..=28).contains(&second.pending), "{second}");

        for _ in 0..1000 {
            if engine.tick(far).unwrap().pending == 0 {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(2));
        }
        assert_eq!(engine.pending_count(), 0);
        assert_eq!(engine.world().chunk_count(), 27);
        assert!(engine
            .world()
            .chunk_positions()
            .iter()
            .all(|chunk| (2499..=2501).contains(&chunk.x)));
    }

    #[test]
    fn invalid_config_is_fatal() {
        let bad = WorldConfig {
            chunk_size: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            EngineState::new(&bad, HeadlessBackend::new()),
            Err(EngineError::Config(_))
        ));
    }
}
