use cachestat::concurrency::StripedAccumulator;
use cachestat::Counter;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_counter_basic() {
    let counter = Counter::new();
    counter.increment();
    counter.add(9);
    counter.add(-3);
    assert_eq!(counter.count(), 7);
}

#[test]
fn test_counter_exact_after_join() {
    const THREADS: usize = 32;
    const ITERS: i64 = 10_000;

    let counter = Arc::new(Counter::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let counter = Arc::clone(&counter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ITERS {
                    if i % 4 == 0 {
                        counter.add(t as i64);
                    } else {
                        counter.increment();
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let per_thread_increments = ITERS - ITERS / 4;
    let expected: i64 = (0..THREADS as i64)
        .map(|t| per_thread_increments + t * (ITERS / 4))
        .sum();
    assert_eq!(counter.count(), expected);
}

#[test]
fn test_shard_table_stays_within_cap() {
    let cpus = thread::available_parallelism().map_or(1, |n| n.get());
    let acc = StripedAccumulator::new();
    let barrier = Barrier::new(cpus * 8);

    thread::scope(|s| {
        for _ in 0..cpus * 8 {
            s.spawn(|| {
                barrier.wait();
                for _ in 0..5_000 {
                    acc.add(1);
                }
            });
        }
    });

    assert_eq!(acc.sum(), (cpus * 8 * 5_000) as i64);
    let shards = acc.shard_len();
    assert!(shards <= 4 * cpus, "{shards} shards on {cpus} cpus");
    assert!(shards == 0 || (shards >= 2 && shards.is_power_of_two()));
}

#[test]
fn test_small_cap_is_honoured() {
    let acc = StripedAccumulator::with_max_shards(2);
    thread::scope(|s| {
        for _ in 0..16 {
            s.spawn(|| {
                for _ in 0..2_000 {
                    acc.add(3);
                }
            });
        }
    });
    assert_eq!(acc.sum(), 16 * 2_000 * 3);
    assert!(acc.shard_len() <= 2);
}

#[test]
fn test_reads_are_idempotent() {
    let counter = Counter::new();
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..1_000 {
                    counter.increment();
                }
            });
        }
    });
    let first = counter.count();
    let second = counter.count();
    assert_eq!(first, second);
    assert_eq!(first, 4_000);
}

#[test]
fn test_reader_never_sees_a_writers_total_go_backwards() {
    let counter = Counter::new();
    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..50_000 {
                counter.increment();
            }
        });
        for _ in 0..3 {
            s.spawn(|| {
                for _ in 0..50_000 {
                    counter.add(2);
                }
            });
        }
        s.spawn(|| {
            let mut last = 0;
            for _ in 0..10_000 {
                let now = counter.count();
                assert!(now >= last, "count went from {last} to {now}");
                last = now;
            }
        });
    });
    assert_eq!(counter.count(), 50_000 + 3 * 100_000);
}
