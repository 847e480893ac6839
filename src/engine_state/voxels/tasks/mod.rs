//! # Voxel Task System
//!
//! Tasks that move chunk generation off the owning thread. Results are only
//! ever applied to the world through `TaskManager::process_completed_tasks`.

pub mod chunk_generation_task;
