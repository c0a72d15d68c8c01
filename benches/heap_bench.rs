//! Benchmark for heap construction.
//!
//! Compares bottom-up `build` against repeated `insert`, and measures a full
//! drain by `extract_root`.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use treeviz::heap::{Heap, HeapMode};
use treeviz::step::Trace;

fn random_keys(size: usize) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..size).map(|_| rng.random_range(0..1_000_000)).collect()
}

// =============================================================================
// build Benchmark
// =============================================================================

fn benchmark_build(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("heap_build");

    for size in [100, 1000, 10000] {
        let keys = random_keys(size);

        group.bench_with_input(BenchmarkId::new("build", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut heap = Heap::new(HeapMode::Min);
                heap.build(keys.iter().copied(), &mut Trace::headless());
                black_box(heap)
            });
        });

        group.bench_with_input(BenchmarkId::new("insert", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut heap = Heap::new(HeapMode::Min);
                let mut trace = Trace::headless();
                for &key in keys {
                    heap.insert(black_box(key), &mut trace);
                }
                black_box(heap)
            });
        });
    }

    group.finish();
}

// =============================================================================
// extract Benchmark
// =============================================================================

fn benchmark_drain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("heap_drain");

    for size in [100, 1000] {
        let mut heap = Heap::new(HeapMode::Max);
        heap.build(random_keys(size), &mut Trace::headless());

        group.bench_with_input(BenchmarkId::from_parameter(size), &heap, |bencher, heap| {
            bencher.iter(|| {
                let mut heap = heap.clone();
                let mut trace = Trace::headless();
                while let Ok(key) = heap.extract_root(&mut trace) {
                    black_box(key);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_drain);
criterion_main!(benches);
