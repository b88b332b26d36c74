//! Concurrent FIFO Cost Cache
//!
//! A thread-safe counterpart to [`FifoCache`](crate::FifoCache). One
//! `parking_lot::Mutex` serializes every operation on the engine, so eviction
//! order is global and identical to the single-threaded cache.
//!
//! The cache can subscribe to [`ResourceSignal`] sources at construction. Each
//! subscription clears the cache through the same lock when its source fires,
//! and is removed again when the cache is dropped.
//!
//! # Example
//!
//! ```rust
//! use fifo_cost_cache::config::FifoCacheConfig;
//! use fifo_cost_cache::ConcurrentFifoCache;
//!
//! let config = FifoCacheConfig {
//!     count_limit: Some(2),
//!     cost_limit: Some(100),
//! };
//! let cache: ConcurrentFifoCache<&str, Vec<u8>> = ConcurrentFifoCache::init(config, None);
//!
//! cache.put_with_cost("a", vec![0; 40], 40);
//! cache.put_with_cost("b", vec![0; 40], 40);
//! cache.put_with_cost("c", vec![0; 40], 40);
//!
//! assert!(!cache.contains_key(&"a"));
//! assert_eq!(cache.total_cost(), 80);
//! ```

extern crate alloc;

use crate::config::FifoCacheConfig;
use crate::fifo::FifoSegment;
use crate::metrics::CacheMetrics;
use crate::signal::{ResourceSignal, SignalHandler, SignalKind, SubscriptionId};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use parking_lot::Mutex;
use tracing::trace;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe FIFO cost cache guarded by a single lock.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone + Send`.
/// - `V`: Value type. Must implement `Send`; `get` additionally needs `Clone`.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Example
///
/// ```rust
/// use fifo_cost_cache::ConcurrentFifoCache;
/// use std::sync::Arc;
///
/// let cache = Arc::new(ConcurrentFifoCache::new());
///
/// cache.put("key".to_string(), 42);
/// assert_eq!(cache.get("key"), Some(42));
/// ```
pub struct ConcurrentFifoCache<K, V, S = DefaultHashBuilder> {
    segment: Arc<Mutex<FifoSegment<K, V, S>>>,
    subscriptions: Vec<(Arc<dyn ResourceSignal>, SubscriptionId)>,
}

impl<K, V> ConcurrentFifoCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    /// Creates a concurrent cache from a configuration with an optional hasher.
    pub fn init(config: FifoCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }

    /// Creates a concurrent cache with no limits.
    pub fn new() -> Self {
        Self::init(FifoCacheConfig::default(), None)
    }

    /// Creates a concurrent cache with the given optional count and cost limits.
    pub fn with_limits(count_limit: Option<usize>, cost_limit: Option<u64>) -> Self {
        Self::init(FifoCacheConfig::with_limits(count_limit, cost_limit), None)
    }

    /// Creates a concurrent cache that clears itself whenever one of `sources`
    /// fires.
    ///
    /// The subscriptions are removed when the cache is dropped.
    pub fn with_signals<I>(config: FifoCacheConfig, sources: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ResourceSignal>>,
    {
        let mut cache = Self::init(config, None);
        for source in sources {
            cache.subscribe_to(source);
        }
        cache
    }
}

impl<K, V> Default for ConcurrentFifoCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ConcurrentFifoCache<K, V, S>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
    S: BuildHasher + Send + 'static,
{
    /// Creates a concurrent cache with a custom hash builder.
    pub fn init_with_hasher(config: FifoCacheConfig, hash_builder: S) -> Self {
        Self {
            segment: Arc::new(Mutex::new(FifoSegment::init(config, hash_builder))),
            subscriptions: Vec::new(),
        }
    }

    /// Subscribes to `source` so that every notification clears the cache.
    ///
    /// The handler only holds a weak reference to the cache; a notification
    /// that races with the cache being dropped does nothing.
    pub fn subscribe_to(&mut self, source: Arc<dyn ResourceSignal>) {
        let segment = Arc::downgrade(&self.segment);
        let handler: SignalHandler = Arc::new(move |kind: SignalKind| {
            if let Some(segment) = segment.upgrade() {
                trace!(?kind, "clearing cache on resource signal");
                segment.lock().clear();
            }
        });
        let id = source.subscribe(handler);
        self.subscriptions.push((source, id));
    }

    /// Returns the number of signal sources this cache is subscribed to.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns the configured count limit.
    pub fn count_limit(&self) -> Option<usize> {
        self.segment.lock().config().count_limit
    }

    /// Returns the configured cost limit.
    pub fn cost_limit(&self) -> Option<u64> {
        self.segment.lock().config().cost_limit
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Returns the sum of the costs of all entries.
    pub fn total_cost(&self) -> u64 {
        self.segment.lock().total_cost()
    }

    /// Retrieves a clone of the value for `key`.
    ///
    /// Returns a **clone** so the lock is not held by the caller. For reads that
    /// don't need ownership, use [`get_with()`](Self::get_with) instead.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Applies `f` to the value for `key` while holding the lock.
    ///
    /// `f` must not call back into this cache.
    ///
    /// ```rust
    /// use fifo_cost_cache::ConcurrentFifoCache;
    ///
    /// let cache = ConcurrentFifoCache::new();
    /// cache.put("key".to_string(), "hello world".to_string());
    /// assert_eq!(cache.get_with("key", |value| value.len()), Some(11));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Applies `f` to a mutable reference to the value for `key`.
    ///
    /// The entry keeps its cost and its position in the eviction order.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.segment.lock().get_mut(key).map(f)
    }

    /// Checks if the cache contains `key`. Does not touch metrics or order.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains_key(key)
    }

    /// Inserts `value` for `key` with a cost of zero.
    ///
    /// Returns the value previously stored for `key`, if any.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.segment.lock().put_with_cost(key, value, 0)
    }

    /// Inserts `value` for `key` with the given cost, then enforces the limits.
    pub fn put_with_cost(&self, key: K, value: V, cost: u64) -> Option<V> {
        self.segment.lock().put_with_cost(key, value, cost)
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().remove(key)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    /// Re-applies the configured limits.
    pub fn trim(&self) {
        self.segment.lock().trim();
    }

    /// Evicts from the head until at most `limit` entries remain.
    pub fn trim_by_count(&self, limit: usize) -> usize {
        self.segment.lock().trim_by_count(limit)
    }

    /// Evicts from the head until the total cost is at most `limit`.
    pub fn trim_by_cost(&self, limit: u64) -> usize {
        self.segment.lock().trim_by_cost(limit)
    }

    /// Returns a snapshot of the keys in eviction order.
    pub fn keys(&self) -> Vec<K> {
        self.segment
            .lock()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        self.segment.lock().check_invariants();
    }
}

impl<K, V, S> CacheMetrics for ConcurrentFifoCache<K, V, S>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
    S: BuildHasher + Send + 'static,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentFIFO"
    }
}

impl<K, V, S> Drop for ConcurrentFifoCache<K, V, S> {
    fn drop(&mut self) {
        for (source, id) in self.subscriptions.drain(..) {
            source.unsubscribe(id);
        }
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentFifoCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentFifoCache")
            .field("segment", &*self.segment.lock())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalHub;

    extern crate std;
    use std::format;
    use std::string::ToString;
    use std::thread;

    #[test]
    fn test_basic_operations() {
        let cache: ConcurrentFifoCache<String, i32> = ConcurrentFifoCache::new();

        assert!(cache.is_empty());
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("c"), None);
        cache.check_invariants();
    }

    #[test]
    fn test_count_limit() {
        let cache = ConcurrentFifoCache::with_limits(Some(2), None);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.count_limit(), Some(2));
    }

    #[test]
    fn test_cost_limit() {
        let cache = ConcurrentFifoCache::with_limits(None, Some(15));
        cache.put_with_cost("a", 1, 10);
        cache.put_with_cost("b", 2, 10);
        assert!(!cache.contains_key(&"a"));
        assert_eq!(cache.total_cost(), 10);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.cost_limit(), Some(15));
    }

    #[test]
    fn test_get_with_and_get_mut_with() {
        let cache: ConcurrentFifoCache<String, i32> = ConcurrentFifoCache::new();
        cache.put("counter".to_string(), 0);

        cache.get_mut_with("counter", |v: &mut i32| *v += 1);
        cache.get_mut_with("counter", |v: &mut i32| *v += 1);
        assert_eq!(cache.get_with("counter", |v: &i32| *v * 10), Some(20));
        assert_eq!(cache.get_with("missing", |v: &i32| *v), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = ConcurrentFifoCache::new();
        cache.put_with_cost("x", 1, 5);
        assert_eq!(cache.remove(&"x"), Some(1));
        assert_eq!(cache.remove(&"x"), None);
        assert_eq!(cache.total_cost(), 0);

        for i in 0..100 {
            cache.put_with_cost("k", i, 1);
        }
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_cost(), 0);
    }

    #[test]
    fn test_trims_and_keys() {
        let cache = ConcurrentFifoCache::new();
        for i in 0..10u64 {
            cache.put_with_cost(i, i, 10);
        }
        assert_eq!(cache.trim_by_count(5), 5);
        assert_eq!(cache.keys(), [5, 6, 7, 8, 9]);
        assert_eq!(cache.trim_by_cost(20), 3);
        assert_eq!(cache.keys(), [8, 9]);
        cache.trim();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_signal_clears_cache() {
        let pressure = Arc::new(SignalHub::new());
        let lifecycle = Arc::new(SignalHub::new());
        let cache: ConcurrentFifoCache<u32, u32> = ConcurrentFifoCache::with_signals(
            FifoCacheConfig::default(),
            [
                Arc::clone(&pressure) as Arc<dyn ResourceSignal>,
                Arc::clone(&lifecycle) as Arc<dyn ResourceSignal>,
            ],
        );
        assert_eq!(cache.subscription_count(), 2);

        for i in 0..10 {
            cache.put(i, i);
        }
        pressure.notify(SignalKind::MemoryPressure);
        assert!(cache.is_empty());

        cache.put(1, 1);
        lifecycle.notify(SignalKind::Background);
        assert!(cache.is_empty());

        let metrics = cache.metrics();
        assert_eq!(metrics.get("clears"), Some(&2.0));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = Arc::new(SignalHub::new());
        let cache: ConcurrentFifoCache<u32, u32> = ConcurrentFifoCache::with_signals(
            FifoCacheConfig::default(),
            [Arc::clone(&hub) as Arc<dyn ResourceSignal>],
        );
        assert_eq!(hub.subscriber_count(), 1);
        drop(cache);
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.notify(SignalKind::MemoryPressure), 0);
    }

    #[test]
    fn test_signal_concurrent_with_writers() {
        let hub = Arc::new(SignalHub::new());
        let cache: Arc<ConcurrentFifoCache<String, usize>> =
            Arc::new(ConcurrentFifoCache::with_signals(
                FifoCacheConfig::with_limits(Some(200), Some(1_000)),
                [Arc::clone(&hub) as Arc<dyn ResourceSignal>],
            ));

        let mut handles = Vec::new();
        for t in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..2_000 {
                    let key = format!("key_{}", (t * 7 + i) % 300);
                    match i % 3 {
                        0 => {
                            cache.put_with_cost(key, i, (i % 10) as u64);
                        }
                        1 => {
                            let _ = cache.get(&key);
                        }
                        _ => {
                            let _ = cache.remove(&key);
                        }
                    }
                }
            }));
        }
        let notifier = {
            let hub = Arc::clone(&hub);
            thread::spawn(move || {
                for _ in 0..50 {
                    hub.notify(SignalKind::MemoryPressure);
                    thread::yield_now();
                }
            })
        };

        for handle in handles {
            handle.join().unwrap();
        }
        notifier.join().unwrap();

        assert!(cache.len() <= 200);
        assert!(cache.total_cost() <= 1_000);
        cache.check_invariants();
    }

    #[test]
    fn test_init_with_hasher() {
        let cache: ConcurrentFifoCache<String, i32, _> = ConcurrentFifoCache::init_with_hasher(
            FifoCacheConfig::with_limits(Some(4), None),
            DefaultHashBuilder::default(),
        );
        cache.put("test".to_string(), 42);
        assert_eq!(cache.get("test"), Some(42));
    }

    #[test]
    fn test_algorithm_name_and_debug() {
        let cache: ConcurrentFifoCache<String, i32> = ConcurrentFifoCache::new();
        assert_eq!(cache.algorithm_name(), "ConcurrentFIFO");
        let debug = format!("{:?}", cache);
        assert!(debug.contains("ConcurrentFifoCache"));
    }
}
