//! Recording real phase runs and replaying them.
//!
//! Each test: load a shape → run a phase through the stepper while a
//! `TraceWriter<Vec<u8>>` records every move → replay the bytes on a
//! fresh world → compare with the stepper's final state.

use morph_algo::{Phase, ReconfigConfig, Stepper};
use morph_replay::{
    replay_and_verify, ConfigurationFile, DivergenceKind, ReplayError, TraceReader, TraceWriter,
};
use morph_test_utils::{assert_world_invariants, cells, overhang_l, random_connected};
use morph_world::World;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────

fn record_run(start: World, phase: Phase) -> (Vec<u8>, World, usize) {
    let mut writer = TraceWriter::new(Vec::new(), &start).unwrap();
    let mut stepper = Stepper::new(start).with_move_limit(Some(20_000));
    let mut seq = phase.sequence(&ReconfigConfig::default());
    let mut write_error = None;
    let moves = stepper
        .run_with(seq.as_mut(), |mv, world| {
            if write_error.is_none() {
                write_error = writer.record(mv, world).err();
            }
        })
        .unwrap_or_else(|_| stepper.metrics().moves as usize);
    assert!(write_error.is_none(), "{write_error:?}");
    (writer.into_inner(), stepper.into_world(), moves)
}

// ── Scenarios ───────────────────────────────────────────────────

#[test]
fn overhang_run_replays_exactly() {
    let (buf, after, moves) = record_run(overhang_l(), Phase::Complete);
    assert_eq!(moves, 2);
    let summary = replay_and_verify(TraceReader::open(buf.as_slice()).unwrap()).unwrap();
    assert_eq!(summary.frames, 2);
    assert_eq!(cells(&summary.world), cells(&after));
    assert!(summary.world.is_xy_monotone());
}

#[test]
fn configuration_file_feeds_a_run() {
    let json = r#"{
        "version": 1,
        "units": [
            { "x": 0, "y": 0 }, { "x": 1, "y": 0 }, { "x": 2, "y": 0 },
            { "x": 0, "y": 1 }, { "x": 1, "y": 1 }, { "x": 2, "y": 1 },
            { "x": 1, "y": 2, "color": [200, 10, 10] },
            { "x": 2, "y": 2, "color": [200, 10, 10] }
        ]
    }"#;
    let start = ConfigurationFile::from_json(json).unwrap().to_world().unwrap();
    let (_, after, _) = record_run(start, Phase::Complete);
    assert!(after.is_xy_monotone());

    let saved = ConfigurationFile::capture(&after);
    let reloaded = ConfigurationFile::from_json(&saved.to_json().unwrap())
        .unwrap()
        .to_world()
        .unwrap();
    assert_eq!(cells(&reloaded), cells(&after));
    let red = reloaded
        .units()
        .filter(|u| u.color().0 == [200, 10, 10])
        .count();
    assert_eq!(red, 2);
}

#[test]
fn tampered_trace_is_caught() {
    let (mut buf, _, moves) = record_run(overhang_l(), Phase::Complete);
    assert!(moves > 0);
    let last = buf.len() - 1;
    buf[last] ^= 0xff;
    let err = replay_and_verify(TraceReader::open(buf.as_slice()).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        ReplayError::Divergence {
            kind: DivergenceKind::HashMismatch { .. },
            ..
        }
    ));
}

// ── Randomised runs ─────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_recorded_run_verifies(seed in 0u64..100_000, n in 1usize..14) {
        let (buf, after, _) = record_run(random_connected(seed, n), Phase::Complete);
        let summary = replay_and_verify(TraceReader::open(buf.as_slice()).unwrap()).unwrap();
        prop_assert_eq!(cells(&summary.world), cells(&after));
        assert_world_invariants(&summary.world);
    }

    #[test]
    fn canonicalize_run_verifies(seed in 0u64..100_000, n in 1usize..12) {
        let (buf, after, moves) = record_run(random_connected(seed, n), Phase::Canonicalize);
        let summary = replay_and_verify(TraceReader::open(buf.as_slice()).unwrap()).unwrap();
        prop_assert_eq!(summary.frames, moves as u64);
        prop_assert_eq!(cells(&summary.world), cells(&after));
    }
}
