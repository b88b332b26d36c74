//! First-In First-Out (FIFO) Cost Cache Implementation
//!
//! This module provides a bounded cache with O(1) insert, lookup and removal,
//! whose eviction order is the order in which keys were last *written*.
//!
//! # Algorithm
//!
//! Entries live in a hash index keyed by cache key. Every entry is also a node
//! of a doubly-linked list threaded through the index: an entry stores the keys
//! of its neighbours, and `head`/`tail` store the keys of the oldest and newest
//! entries.
//!
//! ```text
//!   head                                              tail
//!    │                                                 │
//!    ▼                                                 ▼
//! ┌──────┐  next   ┌──────┐  next   ┌──────┐  next   ┌──────┐
//! │  k1  │ ──────▶ │  k2  │ ──────▶ │  k3  │ ──────▶ │  k4  │
//! │      │ ◀────── │      │ ◀────── │      │ ◀────── │      │
//! └──────┘  prev   └──────┘  prev   └──────┘  prev   └──────┘
//!  evicted first                              evicted last
//! ```
//!
//! - **put** unlinks an existing entry for the key (if any) and appends the new
//!   entry at the tail, then trims by count and by cost.
//! - **get** never reorders. Eviction order is FIFO-since-last-write, not LRU.
//! - **trim** evicts from the head until the limit holds.
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**:
//!   - Get: O(1)
//!   - Put: O(1) amortized, plus O(e) for e entries evicted
//!   - Remove: O(1)
//!   - Clear: O(n)
//!
//! - **Space Complexity**:
//!   - O(n); each entry carries its cost and up to two cloned neighbour keys
//!
//! # Thread Safety
//!
//! [`FifoCache`] is not synchronized. For shared access use
//! [`ConcurrentFifoCache`](crate::ConcurrentFifoCache) (requires the
//! `concurrent` feature), which serializes every operation behind one lock.

extern crate alloc;

use crate::config::FifoCacheConfig;
use crate::entry::CacheEntry;
use crate::metrics::{CacheMetrics, FifoCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use tracing::debug;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Upper bound on the number of slots reserved up front from a count limit.
const MAX_PREALLOCATED: usize = 4096;

/// Internal FIFO segment containing the eviction engine.
///
/// This is shared between `FifoCache` (single-threaded) and
/// `ConcurrentFifoCache` (locked). All index and list maintenance lives here.
///
/// # Invariants
///
/// - Walking `head` → `tail` through `next` links visits every key of `map`
///   exactly once.
/// - `head` and `tail` are `None` iff `map` is empty.
/// - `total_cost` is the sum of the costs of all entries.
pub(crate) struct FifoSegment<K, V, S = DefaultHashBuilder> {
    config: FifoCacheConfig,
    map: HashMap<K, CacheEntry<K, V>, S>,
    head: Option<K>,
    tail: Option<K>,
    total_cost: u64,
    metrics: FifoCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FifoSegment<K, V, S> {
    pub(crate) fn init(config: FifoCacheConfig, hash_builder: S) -> Self {
        let reserved = config.count_limit.map_or(0, |limit| limit.min(MAX_PREALLOCATED));
        FifoSegment {
            config,
            map: HashMap::with_capacity_and_hasher(reserved, hash_builder),
            head: None,
            tail: None,
            total_cost: 0,
            metrics: FifoCacheMetrics::new(config.count_limit, config.cost_limit),
        }
    }

    #[inline]
    pub(crate) fn config(&self) -> FifoCacheConfig {
        self.config
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub(crate) fn total_cost(&self) -> u64 {
        self.total_cost
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &FifoCacheMetrics {
        &self.metrics
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key) {
            Some(entry) => {
                self.metrics.core.record_hit();
                Some(&entry.value)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get_mut(key) {
            Some(entry) => {
                self.metrics.core.record_hit();
                Some(&mut entry.value)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    #[inline]
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key).map(|entry| &entry.value)
    }

    #[inline]
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Inserts or replaces `key`, moving it to the tail, then enforces the
    /// configured limits. Returns the replaced value, if any.
    pub(crate) fn put_with_cost(&mut self, key: K, value: V, cost: u64) -> Option<V> {
        let previous = self.unlink(&key);
        self.make_room(cost);
        let previous = match previous {
            Some((_, old_value, old_cost)) => {
                self.metrics.core.record_update(old_cost, cost);
                Some(old_value)
            }
            None => {
                self.metrics.core.record_insertion(cost);
                None
            }
        };
        self.link_back(key, value, cost);
        self.trim();
        previous
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, value, cost) = self.unlink(key)?;
        self.metrics.core.record_removal(cost);
        Some(value)
    }

    pub(crate) fn clear(&mut self) {
        let released = self.map.len();
        self.map.clear();
        self.head = None;
        self.tail = None;
        self.total_cost = 0;
        self.metrics.core.record_clear();
        debug!(released, "cleared cache");
    }

    /// Applies the configured count limit, then the configured cost limit.
    pub(crate) fn trim(&mut self) {
        if let Some(limit) = self.config.count_limit {
            self.trim_by_count(limit);
        }
        if let Some(limit) = self.config.cost_limit {
            self.trim_by_cost(limit);
        }
    }

    pub(crate) fn trim_by_count(&mut self, limit: usize) -> usize {
        let mut evicted = 0;
        while self.map.len() > limit {
            if self.evict_front().is_none() {
                break;
            }
            evicted += 1;
        }
        self.metrics.record_count_trim(evicted);
        if evicted > 0 {
            debug!(evicted, limit, remaining = self.map.len(), "trimmed by count");
        }
        evicted
    }

    pub(crate) fn trim_by_cost(&mut self, limit: u64) -> usize {
        let mut evicted = 0;
        while self.total_cost > limit {
            if self.evict_front().is_none() {
                break;
            }
            evicted += 1;
        }
        self.metrics.record_cost_trim(evicted);
        if evicted > 0 {
            debug!(evicted, limit, total_cost = self.total_cost, "trimmed by cost");
        }
        evicted
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            map: &self.map,
            cursor: self.head.as_ref(),
            remaining: self.map.len(),
        }
    }

    /// Removes the head entry and records it as an eviction.
    fn evict_front(&mut self) -> Option<(K, V)> {
        let head = self.head.clone()?;
        let (key, value, cost) = self.unlink(&head)?;
        self.metrics.core.record_eviction(cost);
        Some((key, value))
    }

    /// Evicts from the head until `cost` can be added to the running total
    /// without overflowing it.
    fn make_room(&mut self, cost: u64) {
        let mut evicted = 0usize;
        while self.total_cost.checked_add(cost).is_none() {
            if self.evict_front().is_none() {
                break;
            }
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, cost, "evicted to keep total cost representable");
        }
    }

    /// Appends a new entry at the tail. `key` must not be in the index.
    fn link_back(&mut self, key: K, value: V, cost: u64) {
        debug_assert!(!self.map.contains_key(&key), "key linked twice");
        let prev = self.tail.replace(key.clone());
        match prev.as_ref() {
            Some(prev_key) => {
                let prev_entry = self.map.get_mut(prev_key);
                debug_assert!(prev_entry.is_some(), "tail points outside the index");
                if let Some(prev_entry) = prev_entry {
                    prev_entry.next = Some(key.clone());
                }
            }
            None => self.head = Some(key.clone()),
        }
        self.total_cost += cost;
        self.map.insert(key, CacheEntry::linked_after(value, cost, prev));
    }

    /// Removes `key` from the index and splices its neighbours together.
    fn unlink<Q>(&mut self, key: &Q) -> Option<(K, V, u64)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (key, entry) = self.map.remove_entry(key)?;
        let (value, cost, prev, next) = entry.into_parts();

        match prev.as_ref() {
            Some(prev_key) => {
                let prev_entry = self.map.get_mut(prev_key);
                debug_assert!(prev_entry.is_some(), "prev link points outside the index");
                if let Some(prev_entry) = prev_entry {
                    prev_entry.next = next.clone();
                }
            }
            None => self.head = next.clone(),
        }

        match next {
            Some(next_key) => {
                let next_entry = self.map.get_mut(&next_key);
                debug_assert!(next_entry.is_some(), "next link points outside the index");
                if let Some(next_entry) = next_entry {
                    next_entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        self.total_cost -= cost;
        Some((key, value, cost))
    }

    /// Walks the list and panics if it disagrees with the index.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut visited = 0usize;
        let mut cost = 0u64;
        let mut prev: Option<&K> = None;
        let mut cursor = self.head.as_ref();
        while let Some(key) = cursor {
            let entry = self.map.get(key).expect("list key missing from index");
            assert!(entry.prev.as_ref() == prev, "prev link out of sync");
            visited += 1;
            assert!(visited <= self.map.len(), "list longer than index");
            cost += entry.cost;
            prev = Some(key);
            cursor = entry.next.as_ref();
        }
        assert!(self.tail.as_ref() == prev, "tail does not end the list");
        assert_eq!(visited, self.map.len(), "list shorter than index");
        assert_eq!(cost, self.total_cost, "total cost out of sync");
        assert_eq!(self.head.is_none(), self.map.is_empty());
    }
}

impl<K, V, S> core::fmt::Debug for FifoSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FifoSegment")
            .field("config", &self.config)
            .field("len", &self.map.len())
            .field("total_cost", &self.total_cost)
            .finish()
    }
}

/// Iterator over the entries of a cache, from the next to be evicted to the
/// most recently written.
pub struct Iter<'a, K, V, S = DefaultHashBuilder> {
    map: &'a HashMap<K, CacheEntry<K, V>, S>,
    cursor: Option<&'a K>,
    remaining: usize,
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, entry) = self.map.get_key_value(self.cursor?)?;
        self.cursor = entry.next.as_ref();
        self.remaining = self.remaining.saturating_sub(1);
        Some((key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ExactSizeIterator for Iter<'_, K, V, S> {}

impl<K, V, S> core::fmt::Debug for Iter<'_, K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}

/// A bounded cache that evicts in FIFO-since-last-write order.
///
/// The cache enforces an optional entry-count limit and an optional total-cost
/// limit after every insert. Re-inserting a key replaces its value and cost and
/// makes it the last entry to be evicted. Reads never change the order.
///
/// # Examples
///
/// ```
/// use fifo_cost_cache::FifoCache;
///
/// let mut cache = FifoCache::with_limits(Some(2), None);
///
/// cache.put("apple", 1);
/// cache.put("banana", 2);
///
/// // Reads do not protect an entry from eviction
/// assert_eq!(cache.get(&"apple"), Some(&1));
///
/// // Adding beyond the count limit evicts the oldest write
/// cache.put("cherry", 3);
/// assert_eq!(cache.get(&"apple"), None);
/// assert_eq!(cache.get(&"banana"), Some(&2));
/// assert_eq!(cache.get(&"cherry"), Some(&3));
/// ```
#[derive(Debug)]
pub struct FifoCache<K, V, S = DefaultHashBuilder> {
    segment: FifoSegment<K, V, S>,
}

impl<K: Hash + Eq + Clone, V> FifoCache<K, V, DefaultHashBuilder> {
    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// ```
    /// use fifo_cost_cache::config::FifoCacheConfig;
    /// use fifo_cost_cache::FifoCache;
    ///
    /// let config = FifoCacheConfig {
    ///     count_limit: Some(100),
    ///     cost_limit: None,
    /// };
    /// let cache: FifoCache<u32, String> = FifoCache::init(config, None);
    /// assert!(cache.is_empty());
    /// ```
    pub fn init(config: FifoCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::with_hasher(config, hasher.unwrap_or_default())
    }

    /// Creates a cache with no limits.
    pub fn new() -> Self {
        Self::init(FifoCacheConfig::default(), None)
    }

    /// Creates a cache with the given optional count and cost limits.
    pub fn with_limits(count_limit: Option<usize>, cost_limit: Option<u64>) -> Self {
        Self::init(FifoCacheConfig::with_limits(count_limit, cost_limit), None)
    }
}

impl<K: Hash + Eq + Clone, V> Default for FifoCache<K, V, DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FifoCache<K, V, S> {
    /// Creates a cache from a configuration and a custom hash builder.
    pub fn with_hasher(config: FifoCacheConfig, hash_builder: S) -> Self {
        Self {
            segment: FifoSegment::init(config, hash_builder),
        }
    }

    /// Returns the configured count limit.
    #[inline]
    pub fn count_limit(&self) -> Option<usize> {
        self.segment.config().count_limit
    }

    /// Returns the configured cost limit.
    #[inline]
    pub fn cost_limit(&self) -> Option<u64> {
        self.segment.config().cost_limit
    }

    /// Returns the number of entries in the cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns the sum of the costs of all entries.
    #[inline]
    pub fn total_cost(&self) -> u64 {
        self.segment.total_cost()
    }

    /// Returns a reference to the value for `key` and records a hit or miss.
    ///
    /// The eviction order is not changed.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// Mutating a value in place does not change its cost or its position.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns a reference to the value for `key` without touching metrics.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Checks if the cache contains `key`. Does not touch metrics or order.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains_key(key)
    }

    /// Inserts `value` for `key` with a cost of zero.
    ///
    /// Returns the value previously stored for `key`, if any.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.segment.put_with_cost(key, value, 0)
    }

    /// Inserts `value` for `key` with the given cost, then enforces the limits.
    ///
    /// An existing entry for `key` is replaced and moved to the tail. An entry
    /// whose cost alone exceeds the cost limit is evicted before this returns.
    /// If adding `cost` would overflow the `u64` total, older entries are
    /// evicted from the head first.
    ///
    /// ```
    /// use fifo_cost_cache::FifoCache;
    ///
    /// let mut cache = FifoCache::with_limits(None, Some(15));
    /// cache.put_with_cost("a", 1, 10);
    /// cache.put_with_cost("b", 2, 10);
    /// assert!(!cache.contains_key(&"a"));
    /// assert_eq!(cache.total_cost(), 10);
    /// ```
    #[inline]
    pub fn put_with_cost(&mut self, key: K, value: V, cost: u64) -> Option<V> {
        self.segment.put_with_cost(key, value, cost)
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Re-applies the configured limits.
    #[inline]
    pub fn trim(&mut self) {
        self.segment.trim()
    }

    /// Evicts from the head until at most `limit` entries remain.
    ///
    /// Returns the number of evicted entries.
    #[inline]
    pub fn trim_by_count(&mut self, limit: usize) -> usize {
        self.segment.trim_by_count(limit)
    }

    /// Evicts from the head until the total cost is at most `limit`.
    ///
    /// Returns the number of evicted entries.
    #[inline]
    pub fn trim_by_cost(&mut self, limit: u64) -> usize {
        self.segment.trim_by_cost(limit)
    }

    /// Iterates entries from the next to be evicted to the most recently written.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        self.segment.iter()
    }

    /// Iterates keys in eviction order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.segment.iter().map(|(key, _)| key)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for FifoCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}
