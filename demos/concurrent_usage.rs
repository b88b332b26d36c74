//! Concurrent Cache Usage Examples
//!
//! This example demonstrates multi-threaded usage patterns for the concurrent
//! FIFO cost cache, including memory-pressure signals.
//!
//! Run with: cargo run --example concurrent_usage --features concurrent

extern crate fifo_cost_cache;

use fifo_cost_cache::config::FifoCacheConfig;
use fifo_cost_cache::signal::{ResourceSignal, SignalHub, SignalKind};
use fifo_cost_cache::ConcurrentFifoCache;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    println!("Concurrent Cache Usage Examples");
    println!("================================\n");

    basic_concurrent_usage();
    println!();

    zero_copy_get_with();
    println!();

    cost_bounded_images();
    println!();

    memory_pressure();
    println!();

    throughput();
}

/// Basic multi-threaded cache usage
fn basic_concurrent_usage() {
    println!("1. Basic Concurrent Usage");
    println!("   -----------------------");

    let cache = Arc::new(ConcurrentFifoCache::with_limits(Some(1000), None));

    let num_threads = 4;
    let ops_per_thread = 1000;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = format!("thread{}-key{}", thread_id, i);
                    let value = thread_id * 10000 + i;

                    cache.put(key.clone(), value);

                    // Another thread may already have evicted the key
                    if let Some(v) = cache.get(&key) {
                        assert_eq!(v, value);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    println!(
        "   Completed {} operations across {} threads",
        num_threads * ops_per_thread * 2,
        num_threads
    );
    println!("   Final cache size: {} items", cache.len());
}

/// Zero-copy access pattern using get_with()
fn zero_copy_get_with() {
    println!("2. Zero-Copy Access with get_with()");
    println!("   ----------------------------------");

    let cache: ConcurrentFifoCache<String, Vec<u8>> = ConcurrentFifoCache::new();

    cache.put_with_cost("large_key".to_string(), vec![1u8; 1024], 1024);

    let sum: Option<u64> =
        cache.get_with("large_key", |data| data.iter().map(|&x| x as u64).sum());

    println!("   Stored 1KB of data in cache");
    println!("   Computed sum without cloning: {}", sum.unwrap_or_default());

    let has_zeros: Option<bool> = cache.get_with("large_key", |data| data.contains(&0));
    println!("   Data contains zeros: {}", has_zeros.unwrap_or(false));
}

/// A decoded-image cache bounded by bytes as well as entries
fn cost_bounded_images() {
    println!("3. Cost-Bounded Cache");
    println!("   -------------------");

    let budget = 64 * 1024;
    let cache: ConcurrentFifoCache<String, Vec<u8>> =
        ConcurrentFifoCache::with_limits(Some(100), Some(budget));

    for i in 0..40 {
        let bytes = 4096 + (i % 4) * 1024;
        cache.put_with_cost(format!("image-{}.png", i), vec![0u8; bytes], bytes as u64);
    }

    println!("   Entries kept: {}", cache.len());
    println!("   Bytes kept:   {} / {}", cache.total_cost(), budget);
    if let Some(oldest) = cache.keys().first() {
        println!("   Oldest write still cached: {}", oldest);
    }
}

/// Memory pressure and background notifications clear the cache
fn memory_pressure() {
    println!("4. Memory Pressure Signals");
    println!("   ------------------------");

    let pressure = Arc::new(SignalHub::new());
    let background = Arc::new(SignalHub::new());

    let cache: ConcurrentFifoCache<u32, String> = ConcurrentFifoCache::with_signals(
        FifoCacheConfig::with_limits(Some(1000), None),
        [
            Arc::clone(&pressure) as Arc<dyn ResourceSignal>,
            Arc::clone(&background) as Arc<dyn ResourceSignal>,
        ],
    );

    for i in 0..500 {
        cache.put(i, format!("value-{}", i));
    }
    println!("   Before memory warning: {} items", cache.len());

    let notified = pressure.notify(SignalKind::MemoryPressure);
    println!("   Notified {} cache(s), now {} items", notified, cache.len());

    cache.put(1, "again".to_string());
    background.notify(SignalKind::Background);
    println!("   After entering background: {} items", cache.len());

    drop(cache);
    println!(
        "   Subscribers after drop: {}",
        pressure.subscriber_count() + background.subscriber_count()
    );
}

/// Rough throughput of the single-lock cache
fn throughput() {
    println!("5. Throughput");
    println!("   ----------");

    let ops_per_thread = 100_000;
    for threads in [1, 2, 4, 8] {
        let cache: Arc<ConcurrentFifoCache<usize, usize>> =
            Arc::new(ConcurrentFifoCache::with_limits(Some(10_000), None));

        let start = Instant::now();
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..ops_per_thread {
                        let key = (t * ops_per_thread + i) % 20_000;
                        if i % 5 == 0 {
                            cache.put(key, i);
                        } else {
                            let _ = cache.get(&key);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        let elapsed = start.elapsed();
        let total = (threads * ops_per_thread) as f64;
        println!(
            "   {:>2} threads: {:>10.0} ops/sec",
            threads,
            total / elapsed.as_secs_f64()
        );
    }
}
