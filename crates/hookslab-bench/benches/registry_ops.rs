//! Criterion benchmarks for the locked registries, single- and
//! multi-threaded.

use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hookslab_bench::{churn_workload, run_workload, Op};
use hookslab_registry::{CallbackStore, Registry, RegistryConfig, ShardedRegistry};

fn sharded(shards: usize) -> ShardedRegistry<u64> {
    ShardedRegistry::new(&RegistryConfig {
        shard_count: shards,
        initial_capacity: 1_024,
    })
    .unwrap()
}

/// Benchmark: assign + get + get_and_delete round trip on one thread.
fn bench_round_trip(c: &mut Criterion) {
    let reg = Registry::with_capacity(1_024);
    c.bench_function("registry_round_trip", |b| {
        b.iter(|| {
            let h = reg.assign(black_box(7u64));
            black_box(reg.get(h));
            black_box(reg.get_and_delete(h))
        });
    });
}

/// Benchmark: seeded churn stream, plain vs sharded, one thread.
fn bench_churn(c: &mut Criterion) {
    let ops = churn_workload(0xC0FFEE, 10_000, 128);
    let mut group = c.benchmark_group("registry_churn_10k");
    group.bench_function("plain", |b| {
        let reg = Registry::<u64>::new();
        b.iter(|| run_workload(&reg, &ops));
    });
    for shards in [4, 16] {
        group.bench_with_input(BenchmarkId::new("sharded", shards), &shards, |b, &n| {
            let reg = sharded(n);
            b.iter(|| run_workload(&reg, &ops));
        });
    }
    group.finish();
}

fn contended(store: Arc<dyn CallbackStore<u64>>, threads: usize, ops: &Arc<Vec<Op>>) {
    thread::scope(|scope| {
        for _ in 0..threads {
            let store = Arc::clone(&store);
            let ops = Arc::clone(ops);
            scope.spawn(move || black_box(run_workload(store.as_ref(), &ops)));
        }
    });
}

/// Benchmark: the same churn stream replayed on 8 threads at once.
fn bench_contended(c: &mut Criterion) {
    let ops = Arc::new(churn_workload(0xBEEF, 2_000, 64));
    let mut group = c.benchmark_group("registry_contended_8t");
    group.sample_size(20);
    group.bench_function("plain", |b| {
        let store: Arc<dyn CallbackStore<u64>> = Arc::new(Registry::<u64>::new());
        b.iter(|| contended(Arc::clone(&store), 8, &ops));
    });
    group.bench_function("sharded_8", |b| {
        let store: Arc<dyn CallbackStore<u64>> = Arc::new(sharded(8));
        b.iter(|| contended(Arc::clone(&store), 8, &ops));
    });
    group.finish();
}

criterion_group!(benches, bench_round_trip, bench_churn, bench_contended);
criterion_main!(benches);
