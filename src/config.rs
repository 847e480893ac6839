//! # World Configuration
//!
//! Runtime settings for a world, loaded from JSON. Every field has a default, so
//! `{}` is a valid config:
//!
//! ```json
//! {
//!   "chunk_size": 16,
//!   "seed": 0,
//!   "default_block": "core:air",
//!   "view_distance": 16,
//!   "generator": { "kind": "perlin" },
//!   "eviction": { "margin_chunks": 0, "max_resident_chunks": null },
//!   "unloaded_edits": "ignore",
//!   "generation": { "mode": "synchronous" }
//! }
//! ```

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    engine_state::voxels::generation::GeneratorKind,
    error::{ConfigError, ConfigResult},
};

/// Environment variable naming a config file for the binary.
pub const CONFIG_ENV_VAR: &str = "VOXEL_WORLD_CONFIG";

/// Largest view radius, in chunks, a world accepts. The view cube then holds
/// at most 65³ chunks.
pub const MAX_VIEW_RADIUS: i32 = 32;

/// What the chunk manager does with an edit aimed at a chunk that is not loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnloadedEditPolicy {
    /// Drop the edit and log a warning.
    #[default]
    Ignore,
    /// Fail with `WorldError::ChunkNotLoaded`.
    Reject,
}

/// Where chunk generation runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GenerationMode {
    /// Generate every missing chunk inside the tick that needs it.
    #[default]
    Synchronous,
    /// Generate on a pool of worker threads and publish results as they finish.
    Background { workers: usize },
}

/// Controls which chunks `unload_redundant` drops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvictionConfig {
    /// Extra chunks kept beyond the view radius before a chunk is evicted.
    pub margin_chunks: u32,
    /// Upper bound on loaded chunks; least recently used chunks outside the view
    /// are evicted to stay under it.
    pub max_resident_chunks: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Voxels per chunk axis.
    pub chunk_size: u32,
    /// Seed handed to the terrain generator.
    pub seed: u32,
    /// Block used for empty space by generators and by `clear_block_at`.
    pub default_block: String,
    /// Radius around the viewpoint, in voxels, that must stay loaded.
    pub view_distance: u32,
    pub generator: GeneratorKind,
    pub eviction: EvictionConfig,
    pub unloaded_edits: UnloadedEditPolicy,
    pub generation: GenerationMode,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: 16,
            seed: 0,
            default_block: "core:air".to_owned(),
            view_distance: 16,
            generator: GeneratorKind::default(),
            eviction: EvictionConfig::default(),
            unloaded_edits: UnloadedEditPolicy::default(),
            generation: GenerationMode::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a config from JSON text.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults when it is unset.
    pub fn from_env() -> ConfigResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".to_owned()));
        }
        if self.chunk_size > i32::MAX as u32 {
            return Err(ConfigError::Invalid(format!(
                "chunk_size {} is too large",
                self.chunk_size
            )));
        }
        if self.default_block.trim().is_empty() {
            return Err(ConfigError::Invalid("default_block must not be empty".to_owned()));
        }
        if let GenerationMode::Background { workers: 0 } = self.generation {
            return Err(ConfigError::Invalid(
                "background generation needs at least one worker".to_owned(),
            ));
        }
        if self.eviction.max_resident_chunks == Some(0) {
            return Err(ConfigError::Invalid(
                "max_resident_chunks must be at least 1".to_owned(),
            ));
        }
        self.view_radius()?;
        self.generator.validate().map_err(ConfigError::Invalid)
    }

    /// View radius in chunks.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] when the radius exceeds [`MAX_VIEW_RADIUS`].
    pub fn view_radius(&self) -> ConfigResult<i32> {
        let radius = self.view_distance / self.chunk_size.max(1);
        i32::try_from(radius)
            .ok()
            .filter(|radius| *radius <= MAX_VIEW_RADIUS)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "view_distance {} gives a radius of {radius} chunks, at most {MAX_VIEW_RADIUS} are supported",
                    self.view_distance
                ))
            })
    }
}
