//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which runs chunk work on background threads.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the owning thread with
//!    mutable access to the chunk manager
//! 5. The result can spawn new tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the owning thread
//! - Tasks own their inputs; the chunk manager is only touched in `handle_result`

use cgmath::Point3;

use crate::engine_state::voxels::chunk_manager::ChunkManager;

/// A unit of work that can be executed on a worker thread.
///
/// # Implementation Guidelines
/// - Should own every input it needs (no borrowed engine state)
/// - Should be coarse-grained enough to amortize scheduling overhead
pub trait Task: Send {
    /// Performs the work. Runs on a worker thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;

    /// Chunk-grid coordinate this task works on, if any. Used to cancel queued
    /// tasks whose chunk is no longer needed.
    fn target(&self) -> Option<Point3<i32>> {
        None
    }
}

/// The outcome of a `Task`, applied on the owning thread.
pub trait TaskResult: Send {
    /// Applies the result to the world and returns any follow-up tasks.
    ///
    /// Runs on the owning thread; keep it fast to avoid frame drops.
    fn handle_result(self: Box<Self>, world: &mut ChunkManager) -> Vec<Box<dyn Task + Send>>;

    /// Chunk-grid coordinate the originating task worked on, if any.
    fn target(&self) -> Option<Point3<i32>> {
        None
    }
}
