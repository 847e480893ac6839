//! # Terrain Generation
//!
//! Generators fill a freshly created chunk with its initial voxels. Every
//! generator is a pure function of `(seed, chunk origin, chunk size)`, so the
//! same chunk always regenerates identically, on any thread.
//!
//! The grid a generator returns is in the chunk's z-major storage order
//! (see [`ChunkGridBuilder`]).

use std::sync::Arc;

use cgmath::Point3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::{block::BlockInstance, chunk::chunk_creation::ChunkGridBuilder};

/// Supplies the initial contents of a chunk.
pub trait TerrainGenerator: Send + Sync {
    /// Returns the `chunk_size³` blocks of the chunk whose minimum corner is
    /// `origin` (in world voxel coordinates).
    fn generate(&self, seed: u32, origin: Point3<i32>, chunk_size: u32) -> Vec<BlockInstance>;
}

/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;
/// Noise samples with magnitude above this are solid.
pub const PERLIN_THRESHOLD: f64 = 0.2;

/// 3-D Perlin terrain with caves and overhangs.
///
/// A voxel is solid where the noise falls outside `[-threshold, threshold]`.
/// Solid voxels are layered by how deep they sit below open air: grass on the
/// surface, dirt for the next few voxels, stone beneath.
pub struct PerlinGenerator {
    scale: f64,
    threshold: f64,
    empty: BlockInstance,
}

impl PerlinGenerator {
    const DIRT_DEPTH: i32 = 3;

    pub fn new(scale: f64, threshold: f64, empty: BlockInstance) -> Self {
        PerlinGenerator {
            scale,
            threshold,
            empty,
        }
    }

    fn is_solid(&self, perlin: &Perlin, position: Point3<i32>) -> bool {
        let sample = perlin.get([
            position.x as f64 * self.scale,
            position.y as f64 * self.scale,
            position.z as f64 * self.scale,
        ]);
        !(-self.threshold..=self.threshold).contains(&sample)
    }
}

impl TerrainGenerator for PerlinGenerator {
    fn generate(&self, seed: u32, origin: Point3<i32>, chunk_size: u32) -> Vec<BlockInstance> {
        let perlin = Perlin::new(seed);
        let grass = BlockInstance::new("core:grass");
        let dirt = BlockInstance::new("core:dirt");
        let stone = BlockInstance::new("core:stone");

        ChunkGridBuilder::from_fn(origin, chunk_size, |world| {
            if !self.is_solid(&perlin, world) {
                return self.empty.clone();
            }
            let above = |dy: i32| Point3::new(world.x, world.y + dy, world.z);
            if !self.is_solid(&perlin, above(1)) {
                grass.clone()
            } else if (2..=Self::DIRT_DEPTH).any(|dy| !self.is_solid(&perlin, above(dy))) {
                dirt.clone()
            } else {
                stone.clone()
            }
        })
    }
}

/// Flat ground: `ground` below `ground_height`, `empty` at and above it.
pub struct FlatGenerator {
    ground_height: i32,
    ground: BlockInstance,
    empty: BlockInstance,
}

impl FlatGenerator {
    pub fn new(ground_height: i32, ground: BlockInstance, empty: BlockInstance) -> Self {
        FlatGenerator {
            ground_height,
            ground,
            empty,
        }
    }
}

impl TerrainGenerator for FlatGenerator {
    fn generate(&self, _seed: u32, origin: Point3<i32>, chunk_size: u32) -> Vec<BlockInstance> {
        ChunkGridBuilder::from_fn(origin, chunk_size, |world| {
            if world.y < self.ground_height {
                self.ground.clone()
            } else {
                self.empty.clone()
            }
        })
    }
}

/// Fills every voxel with the same block.
pub struct UniformGenerator {
    block: BlockInstance,
}

impl UniformGenerator {
    pub fn new(block: BlockInstance) -> Self {
        UniformGenerator { block }
    }
}

impl TerrainGenerator for UniformGenerator {
    fn generate(&self, _seed: u32, _origin: Point3<i32>, chunk_size: u32) -> Vec<BlockInstance> {
        vec![self.block.clone(); (chunk_size as usize).pow(3)]
    }
}

/// Alternates `block` and `empty` in a 3-D checkerboard aligned to world space,
/// so the pattern continues seamlessly across chunk borders.
pub struct CheckerboardGenerator {
    block: BlockInstance,
    empty: BlockInstance,
}

impl CheckerboardGenerator {
    pub fn new(block: BlockInstance, empty: BlockInstance) -> Self {
        CheckerboardGenerator { block, empty }
    }
}

impl TerrainGenerator for CheckerboardGenerator {
    fn generate(&self, _seed: u32, origin: Point3<i32>, chunk_size: u32) -> Vec<BlockInstance> {
        ChunkGridBuilder::from_fn(origin, chunk_size, |world| {
            if (world.x + world.y + world.z).rem_euclid(2) == 0 {
                self.block.clone()
            } else {
                self.empty.clone()
            }
        })
    }
}

/// Randomly scatters `block` through empty space with probability `density`.
///
/// The random stream is seeded from the world seed and the chunk origin, so a
/// chunk scatters identically every time it is generated.
pub struct ScatterGenerator {
    block: BlockInstance,
    empty: BlockInstance,
    density: f64,
}

impl ScatterGenerator {
    pub fn new(block: BlockInstance, empty: BlockInstance, density: f64) -> Self {
        ScatterGenerator {
            block,
            empty,
            density,
        }
    }

    fn chunk_seed(seed: u32, origin: Point3<i32>) -> u64 {
        // Large odd multipliers spread neighbouring origins across the seed space.
        (seed as u64)
            ^ (origin.x as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (origin.y as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ (origin.z as i64 as u64).wrapping_mul(0x1656_67B1_9E37_79F9)
    }
}

impl TerrainGenerator for ScatterGenerator {
    fn generate(&self, seed: u32, origin: Point3<i32>, chunk_size: u32) -> Vec<BlockInstance> {
        let mut rng = fastrand::Rng::with_seed(Self::chunk_seed(seed, origin));
        ChunkGridBuilder::from_fn(origin, chunk_size, |_| {
            if rng.f64() < self.density {
                self.block.clone()
            } else {
                self.empty.clone()
            }
        })
    }
}

fn default_perlin_scale() -> f64 {
    PERLIN_SCALE_FACTOR
}

fn default_perlin_threshold() -> f64 {
    PERLIN_THRESHOLD
}

fn default_ground_block() -> String {
    "core:grass".to_owned()
}

fn default_solid_block() -> String {
    "core:solid".to_owned()
}

fn default_scatter_block() -> String {
    "core:dirt".to_owned()
}

fn default_scatter_density() -> f64 {
    0.1
}

/// Generator selection as it appears in a world config.
///
/// ```json
/// { "kind": "flat", "ground_height": 4, "block": "core:stone" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorKind {
    Perlin {
        #[serde(default = "default_perlin_scale")]
        scale: f64,
        #[serde(default = "default_perlin_threshold")]
        threshold: f64,
    },
    Flat {
        #[serde(default)]
        ground_height: i32,
        #[serde(default = "default_ground_block")]
        block: String,
    },
    Uniform {
        #[serde(default = "default_solid_block")]
        block: String,
    },
    Checkerboard {
        #[serde(default = "default_solid_block")]
        block: String,
    },
    Scatter {
        #[serde(default = "default_scatter_block")]
        block: String,
        #[serde(default = "default_scatter_density")]
        density: f64,
    },
}

impl Default for GeneratorKind {
    fn default() -> Self {
        GeneratorKind::Perlin {
            scale: PERLIN_SCALE_FACTOR,
            threshold: PERLIN_THRESHOLD,
        }
    }
}

impl GeneratorKind {
    /// Instantiates the generator. `empty` fills every voxel the generator leaves open.
    pub fn build(&self, empty: &BlockInstance) -> Arc<dyn TerrainGenerator> {
        let empty = empty.clone();
        match self {
            GeneratorKind::Perlin { scale, threshold } => {
                Arc::new(PerlinGenerator::new(*scale, *threshold, empty))
            }
            GeneratorKind::Flat {
                ground_height,
                block,
            } => Arc::new(FlatGenerator::new(
                *ground_height,
                BlockInstance::new(block.as_str()),
                empty,
            )),
            GeneratorKind::Uniform { block } => {
                Arc::new(UniformGenerator::new(BlockInstance::new(block.as_str())))
            }
            GeneratorKind::Checkerboard { block } => Arc::new(CheckerboardGenerator::new(
                BlockInstance::new(block.as_str()),
                empty,
            )),
            GeneratorKind::Scatter { block, density } => Arc::new(ScatterGenerator::new(
                BlockInstance::new(block.as_str()),
                empty,
                *density,
            )),
        }
    }

    /// Checks parameter ranges, returning a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            GeneratorKind::Perlin { scale, threshold } => {
                if !scale.is_finite() || *scale <= 0.0 {
                    return Err(format!("perlin scale must be positive, got {scale}"));
                }
                if !threshold.is_finite() || *threshold < 0.0 {
                    return Err(format!("perlin threshold must be non-negative, got {threshold}"));
                }
            }
            GeneratorKind::Scatter { density, .. } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(format!("scatter density must be within [0, 1], got {density}"));
                }
            }
            GeneratorKind::Flat { .. }
            | GeneratorKind::Uniform { .. }
            | GeneratorKind::Checkerboard { .. } => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Point3<i32> {
        Point3::new(-16, 0, 32)
    }

    #[test]
    fn generators_fill_the_whole_grid() {
        let kinds = [
            GeneratorKind::default(),
            GeneratorKind::Flat {
                ground_height: 3,
                block: default_ground_block(),
            },
            GeneratorKind::Uniform {
                block: default_solid_block(),
            },
            GeneratorKind::Checkerboard {
                block: default_solid_block(),
            },
            GeneratorKind::Scatter {
                block: default_scatter_block(),
                density: 0.5,
            },
        ];
        for kind in kinds {
            let generator = kind.build(&BlockInstance::air());
            assert_eq!(generator.generate(7, origin(), 8).len(), 512, "{kind:?}");
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let perlin = GeneratorKind::default().build(&BlockInstance::air());
        assert_eq!(perlin.generate(42, origin(), 8), perlin.generate(42, origin(), 8));

        let scatter = ScatterGenerator::new(BlockInstance::solid(), BlockInstance::air(), 0.3);
        assert_eq!(scatter.generate(42, origin(), 8), scatter.generate(42, origin(), 8));
    }

    #[test]
    fn flat_ground_splits_at_the_ground_height() {
        let flat = FlatGenerator::new(2, BlockInstance::solid(), BlockInstance::air());
        let grid = flat.generate(0, Point3::new(0, 0, 0), 4);
        // y is the middle axis: index = x + 4 * (y + 4 * z).
        assert!(grid[1 + 4 * (1 + 4 * 3)].is_solid());
        assert!(grid[1 + 4 * (2 + 4 * 3)].is_air());
    }

    #[test]
    fn checkerboard_is_continuous_across_chunks() {
        let checker = CheckerboardGenerator::new(BlockInstance::solid(), BlockInstance::air());
        let left = checker.generate(0, Point3::new(-2, 0, 0), 2);
        let right = checker.generate(0, Point3::new(0, 0, 0), 2);
        // (-1, 0, 0) and (0, 0, 0) are neighbours and must differ.
        assert_ne!(left[1], right[0]);
        assert!(right[0].is_solid());
    }

    #[test]
    fn perlin_uses_the_configured_empty_block() {
        let generator = PerlinGenerator::new(0.02, 10.0, BlockInstance::new("core:void"));
        // Noise never exceeds the threshold, so everything is empty.
        assert!(generator
            .generate(1, origin(), 4)
            .iter()
            .all(|block| block.id() == "core:void"));
    }

    #[test]
    fn kinds_parse_from_tagged_json() {
        let kind: GeneratorKind =
            serde_json::from_str(r#"{ "kind": "scatter", "density": 0.25 }"#).unwrap();
        assert_eq!(
            kind,
            GeneratorKind::Scatter {
                block: "core:dirt".to_owned(),
                density: 0.25
            }
        );
        assert!(GeneratorKind::Scatter {
            block: "core:dirt".to_owned(),
            density: 1.5
        }
        .validate()
        .is_err());
    }
}
