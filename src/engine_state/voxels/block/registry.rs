//! # Block Registry
//!
//! Compile-time table of the core block identifiers and their properties,
//! backed by a perfect hash map so lookups by string key never allocate.

/// Static properties shared by every instance of a block identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockProperties {
    /// Human readable name, used in logs.
    pub display_name: &'static str,
    /// Whether the block occupies its voxel.
    pub solid: bool,
}

/// Core blocks known to the engine.
pub static CORE_BLOCKS: phf::Map<&'static str, BlockProperties> = phf::phf_map! {
    "core:air" => BlockProperties { display_name: "Air", solid: false },
    "core:out_of_bounds" => BlockProperties { display_name: "Out of Bounds", solid: false },
    "core:solid" => BlockProperties { display_name: "Solid", solid: true },
    "core:stone" => BlockProperties { display_name: "Stone", solid: true },
    "core:dirt" => BlockProperties { display_name: "Dirt", solid: true },
    "core:grass" => BlockProperties { display_name: "Grass", solid: true },
    "core:wood" => BlockProperties { display_name: "Wood", solid: true },
};

/// Looks up the properties of a core block, `None` for identifiers outside the core set.
pub fn properties(id: &str) -> Option<&'static BlockProperties> {
    CORE_BLOCKS.get(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{AIR_ID, OUT_OF_BOUNDS_ID, SOLID_ID};

    #[test]
    fn sentinel_ids_are_registered() {
        for id in [AIR_ID, OUT_OF_BOUNDS_ID, SOLID_ID] {
            assert!(properties(id).is_some(), "{id} missing from registry");
        }
        assert_eq!(properties("core:grass").map(|p| p.display_name), Some("Grass"));
        assert!(properties("core:lava").is_none());
    }
}
