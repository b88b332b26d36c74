//! FIFO Cache Metrics
//!
//! Metrics specific to the FIFO cost cache.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// FIFO-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Clone)]
pub struct FifoCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,

    /// Configured count limit, `None` if unbounded
    pub count_limit: Option<usize>,

    /// Number of trims that evicted at least one entry because of the count limit
    pub count_trims: u64,

    /// Number of trims that evicted at least one entry because of the cost limit
    pub cost_trims: u64,
}

impl FifoCacheMetrics {
    /// Creates a new FifoCacheMetrics instance for the given limits
    pub fn new(count_limit: Option<usize>, cost_limit: Option<u64>) -> Self {
        Self {
            core: CoreCacheMetrics::new(cost_limit),
            count_limit,
            count_trims: 0,
            cost_trims: 0,
        }
    }

    /// Records the outcome of a count-driven trim that evicted `evicted` entries
    pub fn record_count_trim(&mut self, evicted: usize) {
        if evicted > 0 {
            self.count_trims += 1;
        }
    }

    /// Records the outcome of a cost-driven trim that evicted `evicted` entries
    pub fn record_cost_trim(&mut self, evicted: usize) {
        if evicted > 0 {
            self.cost_trims += 1;
        }
    }

    /// Converts FIFO metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("count_trims".to_string(), self.count_trims as f64);
        metrics.insert("cost_trims".to_string(), self.cost_trims as f64);
        if let Some(limit) = self.count_limit {
            metrics.insert("count_limit".to_string(), limit as f64);
        }
        metrics
    }
}

impl CacheMetrics for FifoCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "FIFO"
    }
}
