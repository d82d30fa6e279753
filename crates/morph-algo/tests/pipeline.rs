//! End-to-end runs of the phases through the stepper.

use std::collections::BTreeSet;

use morph_algo::{Canonicalize, Phase, ReconfigConfig, StepError, Stepper};
use morph_core::{Direction, Pos};
use morph_test_utils::{
    assert_world_invariants, cells, overhang_l, random_connected, square_with_diagonal, world_from,
};
use morph_world::{Move, World};
use proptest::prelude::*;

/// Generous cap for randomised runs; compaction and canonicalization both
/// lower a bounded potential, so a healthy run stays far below it.
const MOVE_CAP: usize = 50_000;

// ── Named scenarios ─────────────────────────────────────────────

#[test]
fn overhang_becomes_monotone() {
    let mut stepper = Stepper::new(overhang_l());
    let mut seq = Phase::Complete.sequence(&ReconfigConfig::default());
    let moves = stepper.run(seq.as_mut()).unwrap();
    assert_eq!(moves, 2);
    assert!(stepper.world().is_xy_monotone());
    assert_eq!(
        cells(stepper.world()),
        [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1), (0, 2), (1, 2)]
            .into_iter()
            .map(Pos::from)
            .collect::<BTreeSet<_>>()
    );
}

fn complete(start: World) -> (Stepper, Vec<Move>) {
    let mut stepper = Stepper::new(start);
    let mut seq = Phase::Complete.sequence(&ReconfigConfig::default());
    let mut moves = Vec::new();
    stepper.run_with(seq.as_mut(), |mv, _| moves.push(*mv)).unwrap();
    (stepper, moves)
}

fn set(cells: &[(i32, i32)]) -> BTreeSet<Pos> {
    cells.iter().copied().map(Pos::from).collect()
}

#[test]
fn three_unit_l_converges() {
    let (stepper, moves) = complete(world_from(&[(0, 1), (1, 1), (1, 0)]));
    assert_eq!(
        moves,
        vec![
            Move::new(Pos::new(0, 1), Direction::S),
            Move::new(Pos::new(1, 1), Direction::W),
        ]
    );
    assert_eq!(cells(stepper.world()), set(&[(0, 0), (1, 0), (0, 1)]));
}

#[test]
fn j_hook_converges() {
    let (stepper, moves) = complete(world_from(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]));
    assert_eq!(moves.len(), 3);
    assert_eq!(moves[0], Move::new(Pos::new(2, 2), Direction::WS));
    assert_eq!(cells(stepper.world()), set(&[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)]));
}

#[test]
fn light_unit_without_target_does_not_abort_the_run() {
    // ##.
    // ###
    // ..#
    let (stepper, _) = complete(world_from(&[(0, 2), (1, 2), (0, 1), (1, 1), (2, 1), (2, 0)]));
    assert!(stepper.world().is_xy_monotone());
    assert_world_invariants(stepper.world());
}

#[test]
fn diagonal_contact_has_nothing_to_canonicalize() {
    let before = square_with_diagonal();
    let mut stepper = Stepper::new(before.clone());
    assert_eq!(stepper.run(&mut Canonicalize::new()).unwrap(), 0);
    assert_eq!(cells(stepper.world()), cells(&before));
}

#[test]
fn every_phase_accepts_an_empty_world() {
    let config = ReconfigConfig::default();
    for phase in Phase::ALL {
        let mut stepper = Stepper::new(World::new());
        assert_eq!(stepper.run(phase.sequence(&config).as_mut()).unwrap(), 0, "{phase}");
    }
}

// ── Randomised runs ─────────────────────────────────────────────

fn run_phase(seed: u64, n: usize, phase: Phase) -> (Stepper, Result<usize, StepError>) {
    let mut stepper = Stepper::new(random_connected(seed, n)).with_move_limit(Some(MOVE_CAP));
    let mut seq = phase.sequence(&ReconfigConfig::default());
    let result = stepper.run(seq.as_mut());
    (stepper, result)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn complete_always_reaches_monotone(seed in 0u64..100_000, n in 1usize..18) {
        let (stepper, result) = run_phase(seed, n, Phase::Complete);
        prop_assert!(result.is_ok(), "seed {} n {}: {:?}", seed, n, result);
        prop_assert!(stepper.world().is_xy_monotone());
        prop_assert_eq!(stepper.world().len(), n);
        assert_world_invariants(stepper.world());
    }

    #[test]
    fn canonicalize_keeps_the_configuration(seed in 0u64..100_000, n in 1usize..14) {
        let (stepper, result) = run_phase(seed, n, Phase::Canonicalize);
        prop_assert!(result.is_ok(), "{:?}", result);
        prop_assert_eq!(stepper.world().len(), n);
        assert_world_invariants(stepper.world());
    }

    #[test]
    fn compaction_alone_reaches_monotone(seed in 0u64..100_000, n in 1usize..16) {
        for phase in [Phase::CompactSorted, Phase::Compact] {
            let (stepper, result) = run_phase(seed, n, phase);
            prop_assert!(result.is_ok(), "{} seed {} n {}: {:?}", phase, seed, n, result);
            prop_assert!(stepper.world().is_xy_monotone());
            assert_world_invariants(stepper.world());
        }
    }
}
