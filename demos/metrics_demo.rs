//! Cache Metrics Demonstration
//!
//! Runs one workload against caches with different limits and prints the
//! metrics each one reports.

use fifo_cost_cache::{config::FifoCacheConfig, metrics::CacheMetrics, FifoCache};
use std::collections::BTreeMap;

fn main() {
    println!("Cache Metrics Demonstration");
    println!("===========================\n");

    println!("Workload: insert 5 items with costs 1..=5, read 3, rewrite 1, insert 2 more\n");

    let caches: Vec<(String, Box<dyn CacheMetrics>)> = vec![
        ("unbounded".to_string(), Box::new(run_workload(FifoCacheConfig::default()))),
        (
            "count <= 3".to_string(),
            Box::new(run_workload(FifoCacheConfig::with_limits(Some(3), None))),
        ),
        (
            "cost <= 10".to_string(),
            Box::new(run_workload(FifoCacheConfig::with_limits(None, Some(10)))),
        ),
        (
            "count <= 4, cost <= 12".to_string(),
            Box::new(run_workload(FifoCacheConfig::with_limits(Some(4), Some(12)))),
        ),
    ];

    display_metrics_comparison(&caches);
}

fn run_workload(config: FifoCacheConfig) -> FifoCache<&'static str, i32> {
    let mut cache = FifoCache::init(config, None);

    cache.put_with_cost("apple", 1, 1);
    cache.put_with_cost("banana", 2, 2);
    cache.put_with_cost("cherry", 3, 3);
    cache.put_with_cost("date", 4, 4);
    cache.put_with_cost("elderberry", 5, 5);

    cache.get(&"apple");
    cache.get(&"cherry");
    cache.get(&"elderberry");

    // Rewriting moves "banana" to the back of the eviction order
    cache.put_with_cost("banana", 20, 2);

    cache.put_with_cost("fig", 6, 1);
    cache.put_with_cost("grape", 7, 1);

    let order: Vec<&str> = cache.keys().copied().collect();
    println!("{:<24} order: {:?}", format!("{:?}", config), order);
    cache
}

fn display_metrics_comparison(caches: &[(String, Box<dyn CacheMetrics>)]) {
    println!();
    let all: Vec<(&str, BTreeMap<String, f64>)> = caches
        .iter()
        .map(|(name, cache)| (name.as_str(), cache.metrics()))
        .collect();

    let mut names: Vec<&String> = all.iter().flat_map(|(_, m)| m.keys()).collect();
    names.sort();
    names.dedup();

    print!("{:<18}", "metric");
    for (label, _) in &all {
        print!("{:>24}", label);
    }
    println!();

    for name in names {
        print!("{:<18}", name);
        for (_, metrics) in &all {
            match metrics.get(name) {
                Some(value) if value.fract() == 0.0 => print!("{:>24}", value),
                Some(value) => print!("{:>24.3}", value),
                None => print!("{:>24}", "-"),
            }
        }
        println!();
    }

    println!();
    for (label, cache) in caches {
        println!("{}: {}", label, cache.algorithm_name());
    }
}
