//! Canonicalization: greedy descent of the potential `x + y`.
//!
//! Each step takes the unit furthest from the anchor corner and carries it,
//! along a shortest move path, into the nearest empty cell touching the
//! configuration. Ties prefer moving low units up the same diagonal. The
//! phase ends at a fixpoint of that ordering, or as soon as the planner
//! cannot reach the chosen cell; both are normal completion.

use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};

use morph_core::{PhaseError, Pos, WorldError};
use morph_world::{Move, World};

use crate::sequence::MoveSequence;

/// The canonicalization phase.
#[derive(Debug, Default)]
pub struct Canonicalize {
    anchor: Option<Pos>,
    pending: VecDeque<Move>,
    done: bool,
}

impl Canonicalize {
    /// A fresh phase. The anchor is fixed at the first pull.
    pub fn new() -> Self {
        Self::default()
    }

    /// The anchored minimum corner, once known.
    pub fn anchor(&self) -> Option<Pos> {
        self.anchor
    }
}

/// Occupied cell with the highest potential, lowest row on ties.
fn furthest(world: &World) -> Option<Pos> {
    world.positions().max_by_key(|p| (p.potential(), Reverse(p.y)))
}

/// Empty cell in the anchored quadrant touching the configuration, with
/// the lowest potential, highest row on ties.
fn nearest_gap(world: &World, anchor: Pos) -> Option<Pos> {
    let gaps: HashSet<Pos> = world
        .positions()
        .flat_map(Pos::neighbours4)
        .filter(|p| p.x >= anchor.x && p.y >= anchor.y && !world.has(*p))
        .collect();
    gaps.into_iter().min_by_key(|p| (p.potential(), Reverse(p.y), p.x))
}

/// Whether moving `hi` into `lo` would not lower the ordering.
fn is_fixpoint(hi: Pos, lo: Pos) -> bool {
    lo.potential() > hi.potential() || (lo.potential() == hi.potential() && lo.y < hi.y)
}

impl MoveSequence for Canonicalize {
    fn name(&self) -> &'static str {
        "canonicalize"
    }

    fn next_move(&mut self, world: &mut World) -> Result<Option<Move>, PhaseError> {
        if let Some(mv) = self.pending.pop_front() {
            return Ok(Some(mv));
        }
        if self.done {
            return Ok(None);
        }
        let Some(bounds) = world.bounds() else {
            self.done = true;
            return Ok(None);
        };
        let anchor = *self.anchor.get_or_insert(bounds.min_corner());

        let (Some(hi), Some(lo)) = (furthest(world), nearest_gap(world, anchor)) else {
            self.done = true;
            return Ok(None);
        };
        if is_fixpoint(hi, lo) {
            tracing::debug!(hi = %hi, lo = %lo, "canonical form reached");
            self.done = true;
            return Ok(None);
        }
        match world.shortest_move_path(hi, lo) {
            Ok(path) => {
                tracing::debug!(from = %hi, to = %lo, moves = path.len(), "canonicalize step");
                self.pending.extend(path);
                if self.pending.is_empty() {
                    self.done = true;
                }
                Ok(self.pending.pop_front())
            }
            Err(WorldError::Unreachable { from, to }) => {
                tracing::debug!(from = %from, to = %to, "no path left, canonicalization ends");
                self.done = true;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_test_utils::{
        assert_world_invariants, cells, line, rect, square_with_diagonal, world_from,
    };
    use std::collections::BTreeSet;

    fn p(x: i32, y: i32) -> Pos {
        Pos::new(x, y)
    }

    fn run(w: &mut World) -> Vec<Move> {
        let mut seq = Canonicalize::new();
        let mut out = Vec::new();
        while let Some(mv) = seq.next_move(w).unwrap() {
            assert!(mv.is_valid(w), "{mv} invalid");
            mv.execute(w).unwrap();
            out.push(mv);
        }
        out
    }

    #[test]
    fn ordering_keys() {
        let w = rect(2, 2);
        assert_eq!(furthest(&w), Some(p(1, 1)));
        assert_eq!(nearest_gap(&w, p(0, 0)), Some(p(0, 2)));
        assert!(!is_fixpoint(p(1, 1), p(0, 2)));
        assert!(is_fixpoint(p(0, 2), p(1, 1)));
        assert!(is_fixpoint(p(2, 2), p(3, 2)));
    }

    #[test]
    fn square_lifts_its_corner_once() {
        let mut w = rect(2, 2);
        let moves = run(&mut w);
        assert_eq!(moves, vec![Move::new(p(1, 1), morph_core::Direction::NW)]);
        assert!(w.has(p(0, 2)));
    }

    #[test]
    fn line_folds_into_a_corner() {
        let mut w = line(3);
        let moves = run(&mut w);
        assert_eq!(moves.len(), 2);
        assert_eq!(cells(&w), BTreeSet::from([p(0, 0), p(1, 0), p(0, 1)]));
        assert_world_invariants(&w);
    }

    #[test]
    fn diagonal_neighbour_cannot_be_moved() {
        let mut w = square_with_diagonal();
        assert!(run(&mut w).is_empty());
    }

    #[test]
    fn anchor_is_fixed_at_first_pull() {
        let mut w = world_from(&[(3, 4), (4, 4), (5, 4)]);
        let mut seq = Canonicalize::new();
        assert_eq!(seq.anchor(), None);
        let mv = seq.next_move(&mut w).unwrap().unwrap();
        assert_eq!(seq.anchor(), Some(p(3, 4)));
        mv.execute(&mut w).unwrap();
        assert_eq!(seq.anchor(), Some(p(3, 4)));
    }

    #[test]
    fn empty_world_is_already_canonical() {
        let mut w = World::new();
        assert!(run(&mut w).is_empty());
    }
}
