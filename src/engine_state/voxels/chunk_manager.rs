//! # Chunk Manager
//!
//! The `ChunkManager` owns every loaded chunk of a world and is the only way the
//! rest of the engine reaches voxel data.
//!
//! ## Responsibilities
//!
//! - **Streaming**: [`determine_generation`](ChunkManager::determine_generation)
//!   makes sure every chunk in a cube of radius `view_distance / chunk_size`
//!   around the viewpoint exists, generating the missing ones.
//! - **Eviction**: [`unload_redundant`](ChunkManager::unload_redundant) drops
//!   chunks that fell out of range (plus a configurable margin), and optionally
//!   the least recently used ones when a resident cap is set.
//! - **Block access**: world-space queries and edits are routed to the owning
//!   chunk through the single [`CoordinateMapper`].
//! - **Rendering**: [`render`](ChunkManager::render) re-meshes dirty chunks and
//!   draws every loaded chunk into consecutive draw slots.
//!
//! Chunks are keyed by chunk-grid coordinate in a hash map, so every block
//! access is a single O(1) lookup. All mutation goes through `&mut self`, which
//! rules out evicting a chunk while it is being edited or drawn.

use std::{collections::HashMap, sync::Arc};

use cgmath::Point3;
use log::{debug, warn};

use super::{
    block::BlockInstance,
    chunk::{Chunk, ChunkBuffers},
    coords::CoordinateMapper,
    generation::TerrainGenerator,
    residency::Residency,
};
use crate::{
    config::{EvictionConfig, UnloadedEditPolicy, WorldConfig},
    engine_state::rendering::{shader::ChunkProgram, GraphicsBackend, RenderMode},
    error::{ChunkResult, WorldError, WorldResult},
};

pub struct ChunkManager {
    mapper: CoordinateMapper,
    /// Loaded chunks by chunk-grid coordinate. Only fully populated chunks are inserted.
    chunks: HashMap<Point3<i32>, Chunk>,
    seed: u32,
    default_block: BlockInstance,
    /// Radius in voxels; divided by the chunk size to get the chunk radius.
    view_distance: u32,
    /// Chunk radius of the view cube, at most `MAX_VIEW_RADIUS`.
    view_radius: i32,
    generator: Arc<dyn TerrainGenerator>,
    render_mode: RenderMode,
    unloaded_edits: UnloadedEditPolicy,
    eviction: EvictionConfig,
    residency: Residency,
    /// Chunk-grid coordinate of the last viewpoint passed to generation.
    centre: Option<Point3<i32>>,
    /// Buffers of evicted chunks, released on the next render.
    evicted_buffers: Vec<ChunkBuffers>,
}

impl ChunkManager {
    /// Creates an empty world using the generator named in `config`.
    pub fn new(config: &WorldConfig) -> WorldResult<Self> {
        let default_block = BlockInstance::new(config.default_block.as_str());
        let generator = config.generator.build(&default_block);
        Self::with_generator(config, generator)
    }

    /// Creates an empty world with a caller-supplied generator.
    ///
    /// # Errors
    /// Fails if `config.chunk_size` is zero or too large, or if the view
    /// radius exceeds [`MAX_VIEW_RADIUS`](crate::config::MAX_VIEW_RADIUS).
    pub fn with_generator(config: &WorldConfig, generator: Arc<dyn TerrainGenerator>) -> WorldResult<Self> {
        Ok(ChunkManager {
            mapper: CoordinateMapper::new(config.chunk_size)?,
            chunks: HashMap::new(),
            seed: config.seed,
            default_block: BlockInstance::new(config.default_block.as_str()),
            view_distance: config.view_distance,
            view_radius: config.view_radius()?,
            generator,
            render_mode: RenderMode::default(),
            unloaded_edits: config.unloaded_edits,
            eviction: config.eviction,
            residency: Residency::new(),
            centre: None,
            evicted_buffers: Vec::new(),
        })
    }

    pub fn mapper(&self) -> CoordinateMapper {
        self.mapper
    }

    pub fn chunk_size(&self) -> u32 {
        self.mapper.chunk_size()
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn default_block(&self) -> &BlockInstance {
        &self.default_block
    }

    pub fn view_distance(&self) -> u32 {
        self.view_distance
    }

    /// View radius in chunks.
    pub fn view_radius(&self) -> i32 {
        self.view_radius
    }

    /// Shared handle to the terrain generator, for generating off-thread.
    pub fn generator(&self) -> Arc<dyn TerrainGenerator> {
        Arc::clone(&self.generator)
    }

    /// Chunk-grid coordinate of the most recent generation centre.
    pub fn centre(&self) -> Option<Point3<i32>> {
        self.centre
    }

    // ------------------------------------------------------------------
    // Streaming
    // ------------------------------------------------------------------

    /// Every chunk-grid coordinate in the view cube around `centre`, z outermost.
    ///
    /// Chunks whose origin would not fit an `i32` are left out, so the cube is
    /// clipped at the edge of the voxel grid.
    pub fn required_chunks(&self, centre: Point3<i32>) -> Vec<Point3<i32>> {
        let r = self.view_radius;
        let n = self.mapper.chunk_size() as i32;
        let axis = |c: i32| {
            (-r..=r).filter_map(move |d| c.checked_add(d).filter(|chunk| chunk.checked_mul(n).is_some()))
        };

        let side = (2 * r + 1) as usize;
        let mut required = Vec::with_capacity(side * side * side);
        for z in axis(centre.z) {
            for y in axis(centre.y) {
                for x in axis(centre.x) {
                    required.push(Point3::new(x, y, z));
                }
            }
        }
        required
    }

    /// Whether `chunk` lies within `radius` chunks of `centre` on every axis.
    fn within(centre: Point3<i32>, radius: i32, chunk: Point3<i32>) -> bool {
        let close = |a: i32, b: i32| (i64::from(a) - i64::from(b)).abs() <= i64::from(radius);
        close(chunk.x, centre.x) && close(chunk.y, centre.y) && close(chunk.z, centre.z)
    }

    /// Whether `chunk` is inside the current view cube. Before the first
    /// generation call every chunk counts as in view.
    pub fn is_in_view(&self, chunk: Point3<i32>) -> bool {
        self.centre
            .map_or(true, |centre| Self::within(centre, self.view_radius, chunk))
    }

    /// Moves the generation centre to `viewpoint` and lists the required chunks
    /// that are not loaded yet.
    ///
    /// # Errors
    /// Fails fast on a non-finite viewpoint.
    pub fn missing_chunks(&mut self, viewpoint: Point3<f32>) -> WorldResult<Vec<Point3<i32>>> {
        let centre = self.mapper.chunk_containing(viewpoint)?;
        self.centre = Some(centre);
        Ok(self
            .required_chunks(centre)
            .into_iter()
            .filter(|chunk| !self.chunks.contains_key(chunk))
            .collect())
    }

    /// Generates every chunk of the view cube around `viewpoint` that is not
    /// loaded yet. Returns how many chunks were generated.
    ///
    /// Calling this again with the same viewpoint and no eviction in between
    /// generates nothing.
    pub fn determine_generation(&mut self, viewpoint: Point3<f32>) -> WorldResult<usize> {
        let missing = self.missing_chunks(viewpoint)?;
        for chunk in &missing {
            self.generate_chunk(*chunk)?;
        }
        Ok(missing.len())
    }

    /// Builds and populates the chunk at `position`, then inserts it.
    ///
    /// The chunk only becomes visible once fully populated.
    fn generate_chunk(&mut self, position: Point3<i32>) -> ChunkResult<()> {
        let mut chunk = Chunk::new(position, self.chunk_size());
        chunk.populate(self.generator.as_ref(), self.seed)?;
        debug!("Generated chunk at {:?}", chunk.origin());
        self.chunks.insert(position, chunk);
        self.residency.touch(position);
        Ok(())
    }

    /// Inserts a chunk generated elsewhere.
    ///
    /// The chunk is dropped (and `false` returned) if it is unpopulated, sized
    /// for a different world, already loaded, or no longer in view.
    pub fn publish_chunk(&mut self, chunk: Chunk) -> bool {
        let position = chunk.position();
        if !chunk.is_populated()
            || chunk.size() != self.chunk_size()
            || self.chunks.contains_key(&position)
            || !self.is_in_view(position)
        {
            debug!("Discarded generated chunk at {:?}", chunk.origin());
            return false;
        }
        debug!("Published chunk at {:?}", chunk.origin());
        self.chunks.insert(position, chunk);
        self.residency.touch(position);
        true
    }

    // ------------------------------------------------------------------
    // Eviction
    // ------------------------------------------------------------------

    /// Evicts chunks outside the view cube (widened by the configured margin),
    /// then, if a resident cap is set, the least recently used chunks outside
    /// the view cube until the cap is met. Chunks inside the view cube are never
    /// evicted. Returns the evicted chunk-grid coordinates.
    pub fn unload_redundant(&mut self) -> Vec<Point3<i32>> {
        let Some(centre) = self.centre else {
            return Vec::new();
        };
        let radius = self.view_radius;
        let keep_radius = radius.saturating_add_unsigned(self.eviction.margin_chunks);

        let mut evicted: Vec<Point3<i32>> = self
            .chunks
            .keys()
            .copied()
            .filter(|chunk| !Self::within(centre, keep_radius, *chunk))
            .collect();

        if let Some(cap) = self.eviction.max_resident_chunks {
            let remaining = self.chunks.len() - evicted.len();
            if remaining > cap {
                let already = evicted.clone();
                evicted.extend(self.residency.eviction_candidates(remaining - cap, |chunk| {
                    Self::within(centre, radius, *chunk) || already.contains(chunk)
                }));
            }
        }

        for chunk in &evicted {
            self.evict(*chunk);
        }
        evicted
    }

    fn evict(&mut self, position: Point3<i32>) {
        if let Some(mut chunk) = self.chunks.remove(&position) {
            debug!("Evicted chunk at {:?}", chunk.origin());
            self.evicted_buffers.extend(chunk.take_buffers());
        }
        self.residency.forget(&position);
    }

    /// Releases the GPU buffers of chunks evicted since the last call.
    pub fn release_evicted(&mut self, backend: &mut impl GraphicsBackend) {
        for buffers in self.evicted_buffers.drain(..) {
            buffers.release(backend);
        }
    }

    // ------------------------------------------------------------------
    // Block access
    // ------------------------------------------------------------------

    /// The block at a world voxel position.
    ///
    /// Positions in chunks that are not loaded yield the `core:out_of_bounds`
    /// sentinel rather than an error.
    pub fn get_block_at(&self, world: Point3<i32>) -> WorldResult<BlockInstance> {
        let location = self.mapper.locate(world);
        match self.chunks.get(&location.chunk) {
            Some(chunk) => Ok(chunk.get_block(location.local)?.clone()),
            None => Ok(BlockInstance::out_of_bounds()),
        }
    }

    /// Routes an edit to the owning chunk.
    ///
    /// Returns the replaced block, or `None` when the chunk is not loaded and the
    /// edit was dropped under [`UnloadedEditPolicy::Ignore`].
    fn edit(
        &mut self,
        world: Point3<i32>,
        apply: impl FnOnce(&mut Chunk, Point3<usize>) -> ChunkResult<BlockInstance>,
    ) -> WorldResult<Option<BlockInstance>> {
        let location = self.mapper.locate(world);
        let Some(chunk) = self.chunks.get_mut(&location.chunk) else {
            let origin = self.mapper.chunk_origin(location.chunk);
            return match self.unloaded_edits {
                UnloadedEditPolicy::Ignore => {
                    warn!("Dropped edit at {world:?}: chunk at {origin:?} is not loaded");
                    Ok(None)
                }
                UnloadedEditPolicy::Reject => Err(WorldError::ChunkNotLoaded { origin }),
            };
        };
        let origin = chunk.origin();
        let previous = apply(chunk, location.local)?;
        debug!(
            "Replaced {} at {:?} of chunk at {:?}",
            previous.display_name(),
            location.local,
            origin
        );
        self.residency.touch(location.chunk);
        Ok(Some(previous))
    }

    pub fn set_block_at(
        &mut self,
        world: Point3<i32>,
        block: BlockInstance,
    ) -> WorldResult<Option<BlockInstance>> {
        self.edit(world, |chunk, local| chunk.set_block(local, block))
    }

    /// Breaks the block at `world`, leaving `replacement` behind.
    pub fn break_block_at(
        &mut self,
        world: Point3<i32>,
        replacement: BlockInstance,
    ) -> WorldResult<Option<BlockInstance>> {
        self.edit(world, |chunk, local| chunk.break_block(local, replacement))
    }

    pub fn place_block_at(
        &mut self,
        world: Point3<i32>,
        block: BlockInstance,
    ) -> WorldResult<Option<BlockInstance>> {
        self.edit(world, |chunk, local| chunk.place_block(local, block))
    }

    /// Breaks the block at `world`, leaving the world's default block behind.
    pub fn clear_block_at(&mut self, world: Point3<i32>) -> WorldResult<Option<BlockInstance>> {
        let replacement = self.default_block.clone();
        self.break_block_at(world, replacement)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Draws every loaded chunk, one draw slot each starting at `start_slot`,
    /// and returns the next free slot.
    ///
    /// Dirty chunks are re-meshed and re-uploaded first, and buffers of evicted
    /// chunks are released. Chunks are drawn in ascending chunk-grid order.
    pub fn render(
        &mut self,
        backend: &mut impl GraphicsBackend,
        program: &ChunkProgram,
        start_slot: u32,
    ) -> WorldResult<u32> {
        self.release_evicted(backend);

        let mode = self.render_mode;
        let mut slot = start_slot;
        for position in self.chunk_positions() {
            let Some(chunk) = self.chunks.get_mut(&position) else {
                continue;
            };
            chunk.prepare(backend)?;
            if chunk.draw(backend, program, slot, mode)? {
                slot += 1;
            }
        }
        Ok(slot)
    }

    /// Flips between filled and wireframe rendering and returns the new mode.
    pub fn toggle_wireframe(&mut self) -> RenderMode {
        self.render_mode = self.render_mode.toggled();
        self.render_mode
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn is_wireframe(&self) -> bool {
        self.render_mode == RenderMode::Wireframe
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the chunk at chunk-grid coordinate `position` is loaded.
    pub fn contains_chunk(&self, position: Point3<i32>) -> bool {
        self.chunks.contains_key(&position)
    }

    pub fn chunk(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Chunk-grid coordinates of every loaded chunk, in ascending order.
    pub fn chunk_positions(&self) -> Vec<Point3<i32>> {
        let mut positions: Vec<Point3<i32>> = self.chunks.keys().copied().collect();
        positions.sort_unstable_by_key(|p| (p.x, p.y, p.z));
        positions
    }

    /// World-space origins of every loaded chunk, in ascending order.
    pub fn chunk_origins(&self) -> Vec<Point3<i32>> {
        self.chunk_positions()
            .into_iter()
            .map(|position| self.mapper.chunk_origin(position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine_state::{
            rendering::headless::HeadlessBackend,
            voxels::generation::{GeneratorKind, UniformGenerator},
        },
        error::{ConfigError, CoordinateError},
    };

    fn config(chunk_size: u32, view_distance: u32) -> WorldConfig {
        WorldConfig {
            chunk_size,
            view_distance,
            generator: GeneratorKind::Uniform {
                block: "core:stone".to_owned(),
            },
            ..WorldConfig::default()
        }
    }

    fn manager(chunk_size: u32, view_distance: u32) -> ChunkManager {
        ChunkManager::new(&config(chunk_size, view_distance)).unwrap()
    }

    #[test]
    fn oversized_view_distance_is_rejected_up_front() {
        let result = ChunkManager::new(&config(1, 3_000_000_000));
        assert!(matches!(result, Err(WorldError::Config(ConfigError::Invalid(_)))));

        let generator = Arc::new(UniformGenerator::new(BlockInstance::solid()));
        let result = ChunkManager::with_generator(&config(16, 16 * 33), generator);
        assert!(matches!(result, Err(WorldError::Config(_))));
    }

    #[test]
    fn view_cube_is_clipped_at_the_edge_of_the_grid() {
        // Chunk 2 would start at 2^31, one past i32::MAX.
        let n = 1 << 30;
        let mut world = manager(n, n);
        let missing = world.missing_chunks(Point3::new(1.5e9, 0.0, 0.0)).unwrap();

        assert_eq!(world.centre(), Some(Point3::new(1, 0, 0)));
        assert_eq!(missing.len(), 2 * 3 * 3);
        assert!(missing.iter().all(|chunk| (0..=1).contains(&chunk.x)));
        assert!(!world.is_in_view(Point3::new(i32::MIN, 0, 0)));
    }

    #[test]
    fn generates_a_cube_of_chunks_around_the_viewpoint() {
        let mut world = manager(16, 16);
        let generated = world.determine_generation(Point3::new(-1.0, 0.5, 20.0)).unwrap();

        assert_eq!(generated, 27);
        assert_eq!(world.centre(), Some(Point3::new(-1, 0, 1)));
        assert!(world.contains_chunk(Point3::new(-2, -1, 0)));
        assert!(world.contains_chunk(Point3::new(0, 1, 2)));
        assert!(!world.contains_chunk(Point3::new(1, 0, 0)));
        for origin in world.chunk_origins() {
            assert_eq!(origin.x.rem_euclid(16), 0);
            assert_eq!(origin.y.rem_euclid(16), 0);
            assert_eq!(origin.z.rem_euclid(16), 0);
        }
    }

    #[test]
    fn view_distance_below_chunk_size_loads_one_chunk() {
        let mut world = manager(16, 15);
        assert_eq!(world.determine_generation(Point3::new(0.0, 0.0, 0.0)).unwrap(), 1);
    }

    #[test]
    fn generation_is_idempotent() {
        let mut world = manager(8, 8);
        let viewpoint = Point3::new(3.0, -9.0, 100.0);
        world.determine_generation(viewpoint).unwrap();
        let before = world.chunk_origins();
        assert_eq!(world.determine_generation(viewpoint).unwrap(), 0);
        assert_eq!(world.chunk_origins(), before);
    }

    #[test]
    fn non_finite_viewpoints_fail_fast() {
        let mut world = manager(8, 8);
        let result = world.determine_generation(Point3::new(f32::NAN, 0.0, 0.0));
        assert!(matches!(
            result,
            Err(WorldError::Coordinate(CoordinateError::NonFinite { axis: 'x', .. }))
        ));
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn edits_route_through_floor_mapping() {
        let mut world = manager(16, 16);
        world.determine_generation(Point3::new(0.0, 0.0, 0.0)).unwrap();

        let position = Point3::new(-1, -16, 15);
        let previous = world.place_block_at(position, BlockInstance::new("core:wood")).unwrap();
        assert_eq!(previous, Some(BlockInstance::new("core:stone")));
        assert_eq!(world.get_block_at(position).unwrap().id(), "core:wood");

        let chunk = world.chunk(Point3::new(-1, -1, 0)).unwrap();
        assert_eq!(chunk.get_block(Point3::new(15, 0, 15)).unwrap().id(), "core:wood");
        assert!(chunk.is_dirty());
    }

    #[test]
    fn clear_writes_the_default_block() {
        let mut world = manager(4, 4);
        world.determine_generation(Point3::new(0.0, 0.0, 0.0)).unwrap();
        world.clear_block_at(Point3::new(1, 1, 1)).unwrap();
        assert!(world.get_block_at(Point3::new(1, 1, 1)).unwrap().is_air());
    }

    #[test]
    fn unloaded_reads_return_the_sentinel() {
        let world = manager(16, 16);
        assert!(world
            .get_block_at(Point3::new(1000, 0, 0))
            .unwrap()
            .is_out_of_bounds());
    }

    #[test]
    fn unloaded_edits_follow_the_policy() {
        let mut ignoring = manager(16, 0);
        assert_eq!(
            ignoring.set_block_at(Point3::new(5, 5, 5), BlockInstance::solid()).unwrap(),
            None
        );

        let mut rejecting = ChunkManager::new(&WorldConfig {
            unloaded_edits: UnloadedEditPolicy::Reject,
            ..config(16, 0)
        })
        .unwrap();
        let result = rejecting.break_block_at(Point3::new(-5, 5, 5), BlockInstance::air());
        assert!(matches!(
            result,
            Err(WorldError::ChunkNotLoaded { origin }) if origin == Point3::new(-16, 0, 0)
        ));
    }

    #[test]
    fn moving_away_evicts_chunks_outside_the_view() {
        let mut world = manager(16, 16);
        world.determine_generation(Point3::new(0.0, 0.0, 0.0)).unwrap();
        world.determine_generation(Point3::new(16.0, 0.0, 0.0)).unwrap();
        assert_eq!(world.chunk_count(), 27 + 9);

        let mut evicted = world.unload_redundant();
        evicted.sort_unstable_by_key(|p| (p.x, p.y, p.z));
        assert_eq!(evicted.len(), 9);
        assert!(evicted.iter().all(|chunk| chunk.x == -1));
        assert!(world
            .get_block_at(Point3::new(-1, 0, 0))
            .unwrap()
            .is_out_of_bounds());
    }

    #[test]
    fn margin_keeps_nearby_chunks() {
        let mut world = ChunkManager::new(&WorldConfig {
            eviction: EvictionConfig {
                margin_chunks: 1,
                max_resident_chunks: None,
            },
            ..config(16, 16)
        })
        .unwrap();
        world.determine_generation(Point3::new(0.0, 0.0, 0.0)).unwrap();
        world.determine_generation(Point3::new(16.0, 0.0, 0.0)).unwrap();
        assert!(world.unload_redundant().is_empty());
    }

    #[test]
    fn resident_cap_evicts_least_recently_used_chunks_outside_the_view() {
        let mut world = ChunkManager::new(&WorldConfig {
            eviction: EvictionConfig {
                margin_chunks: 8,
                max_resident_chunks: Some(2),
            },
            ..config(4, 0)
        })
        .unwrap();
        for x in 0..4 {
            world.determine_generation(Point3::new(x as f32 * 4.0, 0.0, 0.0)).unwrap();
        }
        // Touch chunk 0 so chunk 1 becomes the least recently used.
        world.set_block_at(Point3::new(0, 0, 0), BlockInstance::air()).unwrap();

        let evicted = world.unload_redundant();
        assert_eq!(evicted, vec![Point3::new(1, 0, 0), Point3::new(2, 0, 0)]);
        assert!(world.contains_chunk(Point3::new(3, 0, 0)));
        assert!(world.contains_chunk(Point3::new(0, 0, 0)));
    }

    #[test]
    fn publish_rejects_duplicates_and_out_of_view_chunks() {
        let mut world = manager(4, 4);
        world.determine_generation(Point3::new(0.0, 0.0, 0.0)).unwrap();

        let generator = UniformGenerator::new(BlockInstance::solid());
        let mut duplicate = Chunk::new(Point3::new(0, 0, 0), 4);
        duplicate.populate(&generator, 0).unwrap();
        assert!(!world.publish_chunk(duplicate));

        let mut far = Chunk::new(Point3::new(9, 0, 0), 4);
        far.populate(&generator, 0).unwrap();
        assert!(!world.publish_chunk(far));

        let unpopulated = Chunk::new(Point3::new(5, 0, 0), 4);
        assert!(!world.publish_chunk(unpopulated));
    }

    #[test]
    fn render_draws_each_chunk_into_its_own_slot() {
        let mut backend = HeadlessBackend::new();
        let program = ChunkProgram::compile(&mut backend).unwrap();
        let mut world = manager(2, 2);
        world.determine_generation(Point3::new(0.0, 0.0, 0.0)).unwrap();

        assert_eq!(world.render(&mut backend, &program, 5).unwrap(), 5 + 27);
        let calls = backend.take_draw_calls();
        assert_eq!(calls.len(), 27);
        assert!(calls.iter().all(|call| call.vertex_count == 8 * 36));
        assert_eq!(calls[0].slot, 5);
        assert_eq!(calls[26].slot, 31);

        world.toggle_wireframe();
        world.render(&mut backend, &program, 0).unwrap();
        assert!(backend
            .take_draw_calls()
            .iter()
            .all(|call| call.mode == RenderMode::Wireframe));
    }

    #[test]
    fn evicted_chunks_leave_the_render_and_release_buffers() {
        let mut backend = HeadlessBackend::new();
        let program = ChunkProgram::compile(&mut backend).unwrap();
        let mut world = manager(2, 0);
        world.determine_generation(Point3::new(0.0, 0.0, 0.0)).unwrap();
        world.render(&mut backend, &program, 0).unwrap();
        assert_eq!(backend.live_buffer_count(), 2);

        world.determine_generation(Point3::new(10.0, 0.0, 0.0)).unwrap();
        assert_eq!(world.unload_redundant(), vec![Point3::new(0, 0, 0)]);
        backend.take_draw_calls();

        assert_eq!(world.render(&mut backend, &program, 0).unwrap(), 1);
        let calls = backend.take_draw_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model.unwrap().w.x, 20.0);
        assert_eq!(backend.live_buffer_count(), 2);
    }
}
