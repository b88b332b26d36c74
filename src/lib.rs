#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Eviction Order
//!
//! Entries are evicted from the head of a list ordered by the time each key was
//! last **written**. Reads do not move entries, so the order is
//! FIFO-since-last-write rather than least-recently-used:
//!
//! ```text
//!  put a   put b   put c   get a   put b   put d (count limit 3)
//!
//!  [a]     [a b]   [a b c] [a b c] [a c b] [c b d]   ← "a" evicted
//!   ▲                                         ▲
//!  head                                      head
//! ```
//!
//! ## Quick Reference
//!
//! | Type | Description | Thread Safe |
//! |------|-------------|-------------|
//! | [`FifoCache`] | Engine with count and cost limits | No (`&mut self`) |
//! | [`ConcurrentFifoCache`] | Same engine behind one lock, plus resource signals | Yes |
//!
//! ## Performance Characteristics
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `get` / `peek` / `contains_key` | O(1) |
//! | `put` / `put_with_cost` | O(1) amortized + O(evicted) |
//! | `remove` | O(1) |
//! | `trim_by_count` / `trim_by_cost` | O(evicted) |
//! | `clear` | O(n) |
//!
//! ## Count and Cost Limits
//!
//! ```rust
//! use fifo_cost_cache::FifoCache;
//! use fifo_cost_cache::config::FifoCacheConfig;
//!
//! // Limit by both count (1000 entries) AND cost (10MB)
//! let config = FifoCacheConfig {
//!     count_limit: Some(1000),
//!     cost_limit: Some(10 * 1024 * 1024),
//! };
//! let mut cache: FifoCache<String, Vec<u8>> = FifoCache::init(config, None);
//!
//! let data = vec![0u8; 1024];
//! cache.put_with_cost("file.bin".to_string(), data, 1024);
//! assert_eq!(cache.total_cost(), 1024);
//! ```
//!
//! ## Concurrent Cache
//!
//! The `concurrent` feature (on by default) provides [`ConcurrentFifoCache`]:
//!
//! ```rust
//! use fifo_cost_cache::ConcurrentFifoCache;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(ConcurrentFifoCache::with_limits(Some(10_000), None));
//!
//! let cache_clone = Arc::clone(&cache);
//! std::thread::spawn(move || {
//!     cache_clone.put("key".to_string(), 42);
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(cache.get("key"), Some(42));
//! ```
//!
//! ## Modules
//!
//! - [`fifo`]: The eviction engine and the single-threaded cache
//! - [`config`]: Cache configuration and input normalization
//! - [`entry`]: Entry type stored in the index
//! - [`metrics`]: Metrics collection for cache monitoring
//! - [`signal`]: Memory-pressure and lifecycle notification sources (requires `concurrent` feature)
//! - [`concurrent`]: Thread-safe cache (requires `concurrent` feature)

#![no_std]

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Cache entry type.
///
/// Provides `CacheEntry<K, V>`, which holds a value, its cost, and the keys of
/// its neighbours in the eviction list.
pub mod entry;

/// Cache configuration structures.
pub mod config;

/// FIFO cost cache implementation.
///
/// Provides a bounded cache that evicts the oldest written entry when its count
/// or cost limit is exceeded.
pub mod fifo;

/// Cache metrics system.
///
/// Provides counters for hits, misses, insertions, updates, removals,
/// evictions and clears, reported through a common trait.
pub mod metrics;

/// Resource signal sources.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod signal;

/// Concurrent cache implementation.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use entry::CacheEntry;
pub use fifo::FifoCache;

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentFifoCache;

#[cfg(test)]
mod tests {
    extern crate std;

    use super::FifoCache;
    use scoped_threadpool::Pool;
    use std::format;
    use std::string::String;
    use std::sync::Mutex;

    #[test]
    fn test_scoped_pool_shared_cache() {
        let cache: Mutex<FifoCache<String, usize>> =
            Mutex::new(FifoCache::with_limits(Some(64), None));
        let mut pool = Pool::new(4);

        pool.scoped(|scope| {
            for t in 0..4 {
                let cache = &cache;
                scope.execute(move || {
                    for i in 0..256 {
                        let key = format!("{}-{}", t, i);
                        cache.lock().unwrap().put_with_cost(key, i, 1);
                    }
                });
            }
        });

        let cache = cache.into_inner().unwrap();
        assert_eq!(cache.len(), 64);
        assert_eq!(cache.total_cost(), 64);
    }
}
