//! # Voxel World Core
//!
//! This module contains the data side of the engine: what the world is made of
//! and how it is stored, streamed and edited.
//!
//! ## Architecture
//!
//! * **Block**: the per-voxel value and the static registry of core blocks
//! * **Coords**: floor-division mapping between world, chunk-grid and local space
//! * **Chunk**: a cubic grid of blocks plus its mesh and GPU buffers
//! * **Generation**: terrain generators that populate new chunks
//! * **ChunkManager**: owns the loaded chunks, streams them around a viewpoint
//!   and routes block edits
//! * **Residency**: least-recently-used tracking for capped eviction
//! * **Tasks**: background chunk generation
//!
//! ## Data Flow
//!
//! 1. The engine passes a viewpoint to the chunk manager
//! 2. The manager works out the missing chunks of the view cube and generates
//!    them (inline or on workers)
//! 3. Block edits are mapped to `(chunk, local)` and mark the chunk dirty
//! 4. Dirty chunks are re-meshed before they are next drawn

pub mod block;
pub mod chunk;
pub mod chunk_manager;
pub mod coords;
pub mod generation;
pub mod residency;
pub mod tasks;
