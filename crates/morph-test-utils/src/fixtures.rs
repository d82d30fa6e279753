//! Reusable shape fixtures.
//!
//! Deterministic shapes for scenario tests plus a seeded generator of
//! random connected configurations for property-style tests and benches.

use std::collections::HashSet;

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use morph_core::{Color, Pos};
use morph_world::World;

/// World from `(x, y)` pairs. Panics on duplicates.
pub fn world_from(cells: &[(i32, i32)]) -> World {
    World::from_positions(cells.iter().copied()).expect("fixture cells must be distinct")
}

/// World from ASCII art, north at the top.
///
/// `#` marks a unit, `.` or a space an empty cell. The last line is row
/// `y = 0`; leading and trailing blank lines are ignored.
pub fn parse_ascii(art: &str) -> World {
    let rows: Vec<&str> = art
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let mut world = World::new();
    for (i, row) in rows.iter().rev().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' {
                world
                    .add(Pos::new(x as i32, i as i32), Color::DEFAULT)
                    .expect("ascii cells are distinct");
            }
        }
    }
    world
}

/// Horizontal line of `n` units at `y = 0`, `x = 0..n`.
pub fn line(n: i32) -> World {
    World::from_positions((0..n).map(|x| (x, 0))).expect("line cells are distinct")
}

/// Filled `w × h` rectangle anchored at the origin.
pub fn rect(w: i32, h: i32) -> World {
    World::from_positions((0..h).flat_map(|y| (0..w).map(move |x| (x, y))))
        .expect("rect cells are distinct")
}

/// Rows of the given widths, all starting at `x = 0`, bottom row first.
pub fn staircase(widths: &[i32]) -> World {
    World::from_positions(
        widths
            .iter()
            .enumerate()
            .flat_map(|(y, &w)| (0..w).map(move |x| (x, y as i32))),
    )
    .expect("staircase cells are distinct")
}

/// 3×2 block with a 2-unit overhang on the top right: not xy-monotone.
///
/// ```text
/// .##
/// ###
/// ###
/// ```
pub fn overhang_l() -> World {
    parse_ascii(
        "
        .##
        ###
        ###
        ",
    )
}

/// 2×2 block plus a unit touching it only diagonally at `(2, 2)`.
pub fn square_with_diagonal() -> World {
    world_from(&[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2)])
}

/// Random 4-connected shape of exactly `n` units, reproducible from `seed`.
///
/// Grows from the origin by attaching a unit to a random free side of a
/// random existing unit.
pub fn random_connected(seed: u64, n: usize) -> World {
    if n == 0 {
        return World::new();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut cells = vec![Pos::new(0, 0)];
    let mut taken: HashSet<Pos> = HashSet::from([Pos::new(0, 0)]);
    while cells.len() < n {
        let base = cells[rng.next_u32() as usize % cells.len()];
        let next = base.neighbours4()[rng.next_u32() as usize % 4];
        if taken.insert(next) {
            cells.push(next);
        }
    }
    World::from_positions(cells).expect("grown cells are distinct")
}
