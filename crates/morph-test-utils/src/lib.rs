//! Test utilities for Morph development.
//!
//! Shape fixtures live in [`fixtures`]; this module adds assertions for
//! the invariants every world must keep between moves.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::BTreeSet;

use morph_core::Pos;
use morph_world::{component_count, World};

pub use fixtures::*;

/// Occupied cells as an ordered set, for order-independent comparison.
pub fn cells(world: &World) -> BTreeSet<Pos> {
    world.positions().collect()
}

/// Assert the world is one 4-connected component with a consistent index.
pub fn assert_world_invariants(world: &World) {
    assert!(world.is_consistent(), "position index out of sync:\n{world}");
    if !world.is_empty() {
        assert_eq!(
            component_count(world),
            1,
            "configuration is disconnected:\n{world}"
        );
    }
}

/// Assert two worlds occupy the same cells.
pub fn assert_same_cells(a: &World, b: &World) {
    assert_eq!(cells(a), cells(b), "cell sets differ:\n{a}\nvs\n{b}");
}
