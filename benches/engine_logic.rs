use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use picross::core::{BoardPolicy, Nonogram, NonogramMeta, PlayBoard};

fn checkerboard(size: usize) -> Vec<Vec<bool>> {
    (0..size)
        .map(|y| (0..size).map(|x| (x + y) % 2 == 0).collect())
        .collect()
}

fn bench_clue_derivation(c: &mut Criterion) {
    let rows = checkerboard(64);
    c.bench_function("derive_clues_64x64", |b| {
        b.iter(|| Nonogram::new(NonogramMeta::named("bench"), black_box(&rows)).unwrap())
    });
}

fn bench_hash(c: &mut Criterion) {
    let rows = checkerboard(64);
    c.bench_function("pattern_hash_64x64", |b| {
        b.iter(|| {
            Nonogram::new(NonogramMeta::named("bench"), black_box(&rows))
                .unwrap()
                .hash()
                .len()
        })
    });
}

fn bench_solved_check(c: &mut Criterion) {
    let pattern = Arc::new(Nonogram::new(NonogramMeta::named("bench"), &checkerboard(64)).unwrap());
    let mut board = PlayBoard::new(pattern, BoardPolicy::default());
    board.solve();
    c.bench_function("solved_by_occupation_64x64", |b| {
        b.iter(|| black_box(&board).is_solved_by_occupation())
    });
}

criterion_group!(benches, bench_clue_derivation, bench_hash, bench_solved_check);
criterion_main!(benches);
