use cachestat::sizing::{estimate_bucket_count, CapacityPartition};
use cachestat::Counter;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread;

const OPS_PER_THREAD: usize = 10_000;

fn bench_contended_increment(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_increment");
    let max_threads = thread::available_parallelism().map_or(4, |n| n.get()).min(16);

    for threads in [1, 2, 4, max_threads] {
        group.bench_with_input(BenchmarkId::new("atomic_i64", threads), &threads, |b, &threads| {
            let total = AtomicI64::new(0);
            b.iter(|| {
                thread::scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            for _ in 0..OPS_PER_THREAD {
                                total.fetch_add(1, Ordering::Relaxed);
                            }
                        });
                    }
                });
                black_box(total.load(Ordering::Relaxed))
            });
        });

        group.bench_with_input(BenchmarkId::new("counter", threads), &threads, |b, &threads| {
            let total = Counter::new();
            b.iter(|| {
                thread::scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            for _ in 0..OPS_PER_THREAD {
                                total.increment();
                            }
                        });
                    }
                });
                black_box(total.count())
            });
        });
    }

    group.finish();
}

fn bench_count(c: &mut Criterion) {
    let counter = Counter::new();
    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..OPS_PER_THREAD {
                    counter.increment();
                }
            });
        }
    });

    c.bench_function("counter_count", |b| b.iter(|| black_box(counter.count())));
}

fn bench_sizing(c: &mut Criterion) {
    let mut group = c.benchmark_group("sizing");
    group.bench_function("partition", |b| {
        b.iter(|| CapacityPartition::compute(black_box(10_000), black_box(0.8)))
    });
    group.bench_function("estimate_small", |b| b.iter(|| estimate_bucket_count(black_box(100))));
    group.bench_function("estimate_large", |b| {
        b.iter(|| estimate_bucket_count(black_box(50_000_000)))
    });
    group.finish();
}

criterion_group!(benches, bench_contended_increment, bench_count, bench_sizing);
criterion_main!(benches);
