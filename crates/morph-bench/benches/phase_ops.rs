//! Criterion benchmarks for whole phase runs and trace recording.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use morph_algo::{Phase, ReconfigConfig, Stepper};
use morph_bench::reference_shapes;
use morph_replay::{world_hash, TraceWriter};
use morph_test_utils::random_connected;
use morph_world::World;

/// Default tunables with a move budget, so a runaway phase still ends.
fn bench_config() -> ReconfigConfig {
    ReconfigConfig {
        max_moves: Some(100_000),
        ..ReconfigConfig::default()
    }
}

/// Run `phase` to completion, ignoring how it ends.
fn run(world: World, phase: Phase, config: &ReconfigConfig) -> usize {
    let mut stepper = Stepper::configured(world, config);
    let mut seq = phase.sequence(config);
    let _ = stepper.run(seq.as_mut());
    stepper.metrics().moves as usize
}

fn bench_complete(c: &mut Criterion) {
    let config = bench_config();
    let mut group = c.benchmark_group("complete");
    group.sample_size(20);
    for (name, world) in reference_shapes() {
        group.bench_function(name, |b| {
            b.iter_batched(
                || world.clone(),
                |w| std::hint::black_box(run(w, Phase::Complete, &config)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_compact_sorted_random_40(c: &mut Criterion) {
    let config = bench_config();
    let world = random_connected(11, 40);
    c.bench_function("compact_sorted_random_40", |b| {
        b.iter_batched(
            || world.clone(),
            |w| std::hint::black_box(run(w, Phase::CompactSorted, &config)),
            BatchSize::SmallInput,
        );
    });
}

fn bench_canonicalize_random_20(c: &mut Criterion) {
    let config = bench_config();
    let world = random_connected(5, 20);
    c.bench_function("canonicalize_random_20", |b| {
        b.iter_batched(
            || world.clone(),
            |w| std::hint::black_box(run(w, Phase::Canonicalize, &config)),
            BatchSize::SmallInput,
        );
    });
}

fn bench_world_hash_200(c: &mut Criterion) {
    let world = random_connected(9, 200);
    c.bench_function("world_hash_200", |b| {
        b.iter(|| std::hint::black_box(world_hash(&world)));
    });
}

/// Record a full complete run of a 40-unit shape into memory.
fn bench_record_trace(c: &mut Criterion) {
    let config = bench_config();
    let world = random_connected(11, 40);
    c.bench_function("record_trace_random_40", |b| {
        b.iter_batched(
            || world.clone(),
            |w| {
                let mut writer = TraceWriter::new(Vec::with_capacity(4096), &w).unwrap();
                let mut stepper = Stepper::configured(w, &config);
                let mut seq = Phase::Complete.sequence(&config);
                let _ = stepper.run_with(seq.as_mut(), |mv, after| {
                    let _ = writer.record(mv, after);
                });
                std::hint::black_box(writer.into_inner())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_complete,
    bench_compact_sorted_random_40,
    bench_canonicalize_random_20,
    bench_world_hash_200,
    bench_record_trace
);
criterion_main!(benches);
