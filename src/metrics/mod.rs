//! Cache Metrics System
//!
//! Provides a metrics system for the cache using BTreeMap-based metrics
//! reporting. The cache tracks counters in [`CoreCacheMetrics`] and exposes
//! them through the [`CacheMetrics`] trait.
//!
//! # Why BTreeMap over HashMap?
//!
//! BTreeMap is used instead of HashMap because:
//! - **Deterministic ordering**: Metrics always appear in consistent order
//! - **Reproducible output**: Essential for tests and benchmark comparisons
//! - **Stable serialization**: JSON/CSV exports have predictable key ordering
//!
//! The performance difference is negligible with ~20 metric keys.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod fifo;

pub use fifo::FifoCacheMetrics;

/// Counters tracked by every cache instance.
///
/// Costs here are the caller-supplied entry costs, in whatever unit the
/// caller uses for them.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of lookups made through `get`
    pub requests: u64,

    /// Number of lookups that found their key
    pub cache_hits: u64,

    /// Number of entries created for a key that was not present
    pub insertions: u64,

    /// Number of puts that replaced an existing key
    pub updates: u64,

    /// Number of entries removed explicitly by key
    pub removals: u64,

    /// Number of entries evicted from the head by a trim
    pub evictions: u64,

    /// Number of full clears, including those triggered by resource signals
    pub clears: u64,

    /// Total cost of all values ever written into the cache
    pub cost_written: u64,

    /// Total cost of all evicted entries
    pub cost_evicted: u64,

    /// Current total cost of the entries in the cache
    pub current_cost: u64,

    /// Configured cost limit, `None` if unbounded
    pub cost_limit: Option<u64>,
}

impl CoreCacheMetrics {
    /// Creates a new CoreCacheMetrics instance for a cache with the given cost limit
    pub fn new(cost_limit: Option<u64>) -> Self {
        Self {
            cost_limit,
            ..Default::default()
        }
    }

    /// Records a lookup that found its key
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key
    ///
    /// Cache misses are calculated as (requests - cache_hits).
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new entry of the given cost
    pub fn record_insertion(&mut self, cost: u64) {
        self.insertions += 1;
        self.cost_written = self.cost_written.saturating_add(cost);
        self.current_cost = self.current_cost.saturating_add(cost);
    }

    /// Records a put that replaced an entry of `old_cost` with one of `new_cost`
    pub fn record_update(&mut self, old_cost: u64, new_cost: u64) {
        self.updates += 1;
        self.cost_written = self.cost_written.saturating_add(new_cost);
        self.current_cost = self
            .current_cost
            .saturating_sub(old_cost)
            .saturating_add(new_cost);
    }

    /// Records an explicit removal of an entry of the given cost
    pub fn record_removal(&mut self, cost: u64) {
        self.removals += 1;
        self.current_cost = self.current_cost.saturating_sub(cost);
    }

    /// Records a limit-driven eviction of an entry of the given cost
    pub fn record_eviction(&mut self, cost: u64) {
        self.evictions += 1;
        self.cost_evicted = self.cost_evicted.saturating_add(cost);
        self.current_cost = self.current_cost.saturating_sub(cost);
    }

    /// Records a full clear
    pub fn record_clear(&mut self) {
        self.clears += 1;
        self.current_cost = 0;
    }

    /// Calculates the cache hit rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no lookups have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates the cache miss rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no lookups have been made
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.cache_hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates how full the cache is relative to its cost limit
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if there is no cost limit or it is 0
    pub fn cost_utilization(&self) -> f64 {
        match self.cost_limit {
            Some(limit) if limit > 0 => self.current_cost as f64 / limit as f64,
            _ => 0.0,
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    ///
    /// # Returns
    /// A BTreeMap containing all core metrics with consistent key ordering
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        // Counters
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("updates".to_string(), self.updates as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("clears".to_string(), self.clears as f64);

        // Rates (0.0 to 1.0)
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        // Cost accounting
        metrics.insert("cost_written".to_string(), self.cost_written as f64);
        metrics.insert("cost_evicted".to_string(), self.cost_evicted as f64);
        metrics.insert("current_cost".to_string(), self.current_cost as f64);
        if let Some(limit) = self.cost_limit {
            metrics.insert("cost_limit".to_string(), limit as f64);
            metrics.insert("cost_utilization".to_string(), self.cost_utilization());
        }

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Trait for retrieving metrics from a cache
///
/// The trait uses BTreeMap to ensure deterministic ordering of metrics, which is
/// essential for reproducible benchmarks and consistent test results.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification
    fn algorithm_name(&self) -> &'static str;
}
