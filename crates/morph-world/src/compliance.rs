//! Invariant-checking helpers shared by this crate's test modules.

use std::collections::BTreeSet;

use proptest::prelude::*;

use morph_core::Pos;

use crate::classify::classify;
use crate::connectivity::component_count;
use crate::moves::Move;
use crate::world::World;

/// Build a world from `(x, y)` pairs.
pub fn world(cells: &[(i32, i32)]) -> World {
    World::from_positions(cells.iter().copied()).expect("fixture cells must be distinct")
}

/// Grow a connected shape: each step attaches a cell beside an existing one.
pub fn grow(picks: &[(u16, u8)]) -> World {
    let mut cells = vec![Pos::new(0, 0)];
    let mut set: BTreeSet<Pos> = cells.iter().copied().collect();
    for &(anchor, side) in picks {
        let base = cells[anchor as usize % cells.len()];
        let next = base.neighbours4()[side as usize % 4];
        if set.insert(next) {
            cells.push(next);
        }
    }
    World::from_positions(cells).expect("grown cells are distinct")
}

/// Strategy for random connected shapes of up to `max` growth steps.
pub fn arb_shape(max: usize) -> impl Strategy<Value = World> {
    prop::collection::vec((any::<u16>(), any::<u8>()), 1..max).prop_map(|p| grow(&p))
}

/// Occupied cells as an ordered set.
pub fn cells(world: &World) -> BTreeSet<Pos> {
    world.positions().collect()
}

/// Execute a valid move and check the world invariants afterwards.
pub fn assert_move_preserves_invariants(world: &mut World, mv: Move) {
    assert!(mv.is_valid(world), "{mv} is not valid");
    let n = world.len();
    mv.execute(world).expect("valid move must execute");
    assert_eq!(world.len(), n, "unit count changed after {mv}");
    assert!(world.is_consistent(), "index out of sync after {mv}");
    assert_eq!(component_count(world), 1, "{mv} disconnected the world");
}

/// Classify twice and check nothing changes the second time.
pub fn assert_classification_idempotent(world: &mut World) {
    classify(world);
    let first = world.snapshot_labels();
    classify(world);
    assert_eq!(world.snapshot_labels(), first, "classification not idempotent");
}

proptest! {
    #[test]
    fn valid_moves_keep_one_component(shape in arb_shape(40), pick in any::<usize>()) {
        let mut w = shape;
        let moves: Vec<Move> = w
            .positions()
            .flat_map(|p| morph_core::Direction::ALL.into_iter().map(move |d| Move::new(p, d)))
            .filter(|m| m.is_valid(&w))
            .collect();
        prop_assume!(!moves.is_empty());
        let mv = moves[pick % moves.len()];
        assert_move_preserves_invariants(&mut w, mv);
    }

    #[test]
    fn classification_is_idempotent(shape in arb_shape(40)) {
        let mut w = shape;
        assert_classification_idempotent(&mut w);
    }

    #[test]
    fn grown_shapes_are_connected(shape in arb_shape(60)) {
        prop_assert!(shape.is_connected(None));
        prop_assert!(shape.is_consistent());
    }
}
