//! Criterion micro-benchmarks for connectivity, the contour walk, the
//! classifier and the chunkiness oracle.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use morph_bench::{hollow_square, reference_shapes};
use morph_core::Direction;
use morph_test_utils::random_connected;
use morph_world::{articulation_points, classify, preserves_chunkiness, Contour, Move};

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    for (name, world) in reference_shapes() {
        group.bench_function(name, |b| {
            b.iter_batched(
                || world.clone(),
                |mut w| std::hint::black_box(classify(&mut w)),
                BatchSize::SmallInput,
            );
        });
    }
    let random = random_connected(42, 200);
    group.bench_function("random_200", |b| {
        b.iter_batched(
            || random.clone(),
            |mut w| std::hint::black_box(classify(&mut w)),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_articulation_points_200(c: &mut Criterion) {
    let world = random_connected(7, 200);
    c.bench_function("articulation_points_200", |b| {
        b.iter(|| std::hint::black_box(articulation_points(&world)));
    });
}

fn bench_contour_hollow_square(c: &mut Criterion) {
    let world = hollow_square(24);
    c.bench_function("contour_hollow_24", |b| {
        b.iter(|| std::hint::black_box(Contour::trace(&world)));
    });
}

/// Every valid move of a 60-unit shape through the oracle.
fn bench_oracle_all_moves(c: &mut Criterion) {
    let mut world = random_connected(3, 60);
    classify(&mut world);
    let moves: Vec<Move> = world
        .positions()
        .flat_map(|p| Direction::ALL.into_iter().map(move |d| Move::new(p, d)))
        .filter(|mv| mv.is_valid(&world))
        .collect();

    c.bench_function("oracle_all_moves_60", |b| {
        b.iter(|| {
            let mut kept = 0usize;
            for mv in &moves {
                if let Ok(true) = preserves_chunkiness(&mut world, mv.source, mv.target()) {
                    kept += 1;
                }
            }
            std::hint::black_box(kept)
        });
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_articulation_points_200,
    bench_contour_hollow_square,
    bench_oracle_all_moves
);
criterion_main!(benches);
