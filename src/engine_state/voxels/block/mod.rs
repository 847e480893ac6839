//! # Block Module
//!
//! This module provides the per-voxel data type of the world, [`BlockInstance`],
//! together with the static registry of core block properties and the face
//! enumeration used by the mesher.
//!
//! A block is identified by a namespaced string key such as `"core:solid"` and
//! may carry an optional piece of per-instance state. Two blocks are equal when
//! their identifiers are equal; state is ignored for comparison and hashing.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

pub mod block_side;
pub mod registry;

/// Identifier of empty space.
pub const AIR_ID: &str = "core:air";
/// Identifier of the generic solid block.
pub const SOLID_ID: &str = "core:solid";
/// Identifier returned for queries that fall outside every loaded chunk.
pub const OUT_OF_BOUNDS_ID: &str = "core:out_of_bounds";

/// A single voxel's contents.
///
/// Cloning is cheap: the identifier and the optional state are reference counted,
/// so a chunk full of the same block shares one allocation per distinct value.
///
/// # Examples
///
/// ```
/// use voxel_world::BlockInstance;
///
/// let stone = BlockInstance::new("core:stone");
/// assert!(stone.is_solid());
/// assert_eq!(stone, BlockInstance::with_state("core:stone", serde_json::json!({ "cracked": true })));
/// assert!(BlockInstance::air().is_air());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct BlockInstance {
    id: Arc<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<Arc<serde_json::Value>>,
}

impl BlockInstance {
    /// Creates a stateless block with the given identifier.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        BlockInstance {
            id: id.into(),
            state: None,
        }
    }

    /// Creates a block that carries per-instance state.
    pub fn with_state(id: impl Into<Arc<str>>, state: serde_json::Value) -> Self {
        BlockInstance {
            id: id.into(),
            state: Some(Arc::new(state)),
        }
    }

    /// The empty-space block.
    pub fn air() -> Self {
        Self::new(AIR_ID)
    }

    /// The generic solid block.
    pub fn solid() -> Self {
        Self::new(SOLID_ID)
    }

    /// Sentinel for positions outside every loaded chunk.
    pub fn out_of_bounds() -> Self {
        Self::new(OUT_OF_BOUNDS_ID)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> Option<&serde_json::Value> {
        self.state.as_deref()
    }

    pub fn is_air(&self) -> bool {
        &*self.id == AIR_ID
    }

    pub fn is_out_of_bounds(&self) -> bool {
        &*self.id == OUT_OF_BOUNDS_ID
    }

    /// Registered display name, or the raw identifier for blocks outside the core set.
    pub fn display_name(&self) -> &str {
        registry::properties(&self.id).map_or(&*self.id, |properties| properties.display_name)
    }

    /// Whether the block occupies its voxel. Unregistered identifiers count as solid.
    pub fn is_solid(&self) -> bool {
        registry::properties(&self.id).map_or(true, |properties| properties.solid)
    }
}

impl PartialEq for BlockInstance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BlockInstance {}

impl Hash for BlockInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for BlockInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => write!(f, "{}{}", self.id, state),
            None => write!(f, "{}", self.id),
        }
    }
}

impl fmt::Display for BlockInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for BlockInstance {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_state() {
        let plain = BlockInstance::new("core:wood");
        let rotated = BlockInstance::with_state("core:wood", json!({ "axis": "x" }));
        assert_eq!(plain, rotated);
        assert_ne!(plain, BlockInstance::new("core:stone"));

        let set: HashSet<_> = [plain, rotated].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn sentinels_are_not_solid() {
        assert!(!BlockInstance::air().is_solid());
        assert!(!BlockInstance::out_of_bounds().is_solid());
        assert!(BlockInstance::out_of_bounds().is_out_of_bounds());
        assert!(BlockInstance::solid().is_solid());
        assert!(BlockInstance::new("mod:unknown").is_solid());
    }

    #[test]
    fn display_names_fall_back_to_the_id() {
        assert_eq!(BlockInstance::new("core:wood").display_name(), "Wood");
        assert_eq!(BlockInstance::out_of_bounds().display_name(), "Out of Bounds");
        assert_eq!(BlockInstance::new("mod:marble").display_name(), "mod:marble");
    }

    #[test]
    fn serializes_state_only_when_present() {
        let plain = serde_json::to_value(BlockInstance::solid()).unwrap();
        assert_eq!(plain, json!({ "id": "core:solid" }));

        let stateful = BlockInstance::with_state("core:grass", json!({ "snowy": true }));
        let round_trip: BlockInstance =
            serde_json::from_value(serde_json::to_value(&stateful).unwrap()).unwrap();
        assert_eq!(round_trip.state(), Some(&json!({ "snowy": true })));
    }
}
