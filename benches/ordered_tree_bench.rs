//! Benchmark for ordered tree inserts and traversals.
//!
//! Compares the four variants on ascending and shuffled keys, with headless
//! traces and with frame-capturing traces.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::hint::black_box;
use treeviz::step::Trace;
use treeviz::tree::{OrderedTree, TraversalOrder, Variant};

const VARIANTS: [Variant; 4] = [
    Variant::Bst,
    Variant::Avl,
    Variant::RedBlack,
    Variant::LeftLeaningRedBlack,
];

fn shuffled(size: i64) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..size).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(12345));
    keys
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert_shuffled");

    for size in [100, 1000] {
        let keys = shuffled(size);
        for variant in VARIANTS {
            group.bench_with_input(
                BenchmarkId::new(variant.to_string(), size),
                &keys,
                |bencher, keys| {
                    bencher.iter(|| {
                        let mut tree = OrderedTree::new(variant);
                        let mut trace = Trace::headless();
                        for &key in keys {
                            let _ = tree.insert(black_box(key), &mut trace);
                        }
                        black_box(tree)
                    });
                },
            );
        }
    }

    group.finish();
}

fn benchmark_insert_ascending(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert_ascending");

    for size in [100, 1000] {
        // The unbalanced BST degenerates into a chain here.
        for variant in [Variant::Avl, Variant::RedBlack, Variant::LeftLeaningRedBlack] {
            group.bench_with_input(
                BenchmarkId::new(variant.to_string(), size),
                &size,
                |bencher, &size| {
                    bencher.iter(|| black_box(OrderedTree::from_keys(variant, 0..size)));
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// recording Benchmark
// =============================================================================

fn benchmark_recording(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert_recorded");
    let keys = shuffled(200);

    group.bench_function("headless", |bencher| {
        bencher.iter(|| {
            let mut tree = OrderedTree::new(Variant::Avl);
            let mut trace = Trace::headless();
            for &key in &keys {
                let _ = tree.insert(key, &mut trace);
            }
            black_box(trace.len())
        });
    });

    group.bench_function("with_frames", |bencher| {
        bencher.iter(|| {
            let mut tree = OrderedTree::new(Variant::Avl);
            let mut trace = Trace::new();
            for &key in &keys {
                let _ = tree.insert(key, &mut trace);
            }
            black_box(trace.len())
        });
    });

    group.finish();
}

// =============================================================================
// traverse Benchmark
// =============================================================================

fn benchmark_traverse(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("traverse");
    let tree = OrderedTree::from_keys(Variant::RedBlack, shuffled(1000));

    for order in [TraversalOrder::PreOrder, TraversalOrder::InOrder, TraversalOrder::PostOrder] {
        group.bench_function(order.to_string(), |bencher| {
            bencher.iter(|| {
                let mut trace = Trace::headless();
                black_box(tree.traverse(order, &mut trace))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_insert_ascending,
    benchmark_recording,
    benchmark_traverse
);
criterion_main!(benches);
