//! Benchmark shapes for the Morph reconfiguration engine.
//!
//! Deterministic configurations that exercise the expensive paths:
//!
//! - [`comb`]: a spine with upright teeth; many weak links, many loose units
//! - [`hollow_square`]: a frame around a hole; the contour walk sees an
//!   inner boundary it must not follow
//! - [`reference_shapes`]: the named set every bench iterates over

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use morph_core::{Color, Pos};
use morph_world::World;

/// A horizontal spine with `teeth` columns of height `tooth_len` on every
/// other cell.
///
/// The spine runs from `x = 0` to `x = 2 * (teeth - 1)` on row 0.
pub fn comb(teeth: i32, tooth_len: i32) -> World {
    let mut world = World::new();
    let width = (2 * teeth - 1).max(0);
    for x in 0..width {
        add(&mut world, Pos::new(x, 0));
        if x % 2 == 0 {
            for y in 1..=tooth_len {
                add(&mut world, Pos::new(x, y));
            }
        }
    }
    world
}

/// The one-unit-thick border of a `side × side` square.
pub fn hollow_square(side: i32) -> World {
    let mut world = World::new();
    for y in 0..side {
        for x in 0..side {
            if x == 0 || y == 0 || x == side - 1 || y == side - 1 {
                add(&mut world, Pos::new(x, y));
            }
        }
    }
    world
}

/// Named shapes used across the benches, smallest first.
pub fn reference_shapes() -> Vec<(&'static str, World)> {
    vec![
        ("comb_4x3", comb(4, 3)),
        ("hollow_8", hollow_square(8)),
        ("comb_10x6", comb(10, 6)),
    ]
}

fn add(world: &mut World, pos: Pos) {
    // Cells are generated distinct; a clash would only skip the cell.
    let _ = world.add(pos, Color::DEFAULT);
}
