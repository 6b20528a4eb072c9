//! Store operation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nestkv_bench::{generate_keys, layered_store, random_values};
use nestkv_core::Store;
use rand::Rng;

/// Benchmark single writes into the base frame.
fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");

    for key_count in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*key_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(key_count),
            key_count,
            |b, &count| {
                let keys = generate_keys(count);
                let values = random_values(count, 64);

                b.iter(|| {
                    let mut store = Store::new();
                    for (key, value) in keys.iter().zip(&values) {
                        store.set(key.as_str(), black_box(*value));
                    }
                    black_box(store);
                });
            },
        );
    }
    group.finish();
}

/// Benchmark reads that fall through every open frame to the base.
fn bench_get_through_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_through_depth");

    for depth in [0, 8, 64, 512].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let store = layered_store(1000, depth);
            let keys = generate_keys(1000);
            let mut rng = rand::thread_rng();

            b.iter(|| {
                let idx = rng.gen_range(0..keys.len());
                let _ = black_box(store.get(black_box(&keys[idx])));
            });
        });
    }
    group.finish();
}

/// Benchmark count, which is proportional to depth rather than key count.
fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("count");

    for depth in [0, 8, 64, 512].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let store = layered_store(10000, depth);

            b.iter(|| {
                black_box(store.count(black_box(7)));
            });
        });
    }
    group.finish();
}

/// Benchmark commit flattening of a deep chain.
fn bench_commit_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit_flatten");

    for depth in [1, 16, 256].iter() {
        group.throughput(Throughput::Elements(*depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            b.iter_batched(
                || layered_store(1000, depth),
                |mut store| {
                    black_box(store.commit());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Benchmark begin/rollback round trips.
fn bench_begin_rollback(c: &mut Criterion) {
    c.bench_function("begin_rollback", |b| {
        let mut store = layered_store(1000, 0);

        b.iter(|| {
            store.begin();
            store.set("key1", 1);
            store.delete("key2");
            black_box(store.rollback().unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_set,
    bench_get_through_depth,
    bench_count,
    bench_commit_flatten,
    bench_begin_rollback,
);
criterion_main!(benches);
