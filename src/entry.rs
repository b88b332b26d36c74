//! Cache Entry Type
//!
//! This module provides the `CacheEntry<K, V>` structure stored in the cache's
//! hash index. Each entry is also a node of the eviction order list: instead of
//! holding pointers to its neighbours it holds their *keys*, and every
//! neighbour update goes back through the index.
//!
//! # Memory Layout
//!
//! Each entry has the following overhead:
//! - `value: V` - User's value type
//! - `cost: u64` - 8 bytes (caller-supplied weight)
//! - `prev: Option<K>` - towards the head (older entries)
//! - `next: Option<K>` - towards the tail (newer entries)
//!
//! The key itself lives in the map slot; the two link fields carry clones of
//! the neighbouring keys. Cheap-to-clone keys (integers, `Arc<str>`, short
//! strings) keep this overhead small.
//!
//! # Ownership
//!
//! An entry is exclusively owned by the cache. The link fields are lookups, not
//! ownership, so there are no reference cycles and no `unsafe` code.

use core::fmt;

/// A cached value together with its cost and its position in the eviction list.
///
/// # Examples
///
/// ```
/// use fifo_cost_cache::entry::CacheEntry;
///
/// let entry: CacheEntry<&str, i32> = CacheEntry::new(42, 10);
/// assert_eq!(entry.value, 42);
/// assert_eq!(entry.cost, 10);
/// assert!(entry.is_detached());
/// ```
pub struct CacheEntry<K, V> {
    /// The cached value.
    pub value: V,

    /// Caller-supplied weight counted towards the cache's cost limit.
    pub cost: u64,

    /// Key of the entry closer to the head, `None` if this entry is the head.
    pub(crate) prev: Option<K>,

    /// Key of the entry closer to the tail, `None` if this entry is the tail.
    pub(crate) next: Option<K>,
}

impl<K, V> CacheEntry<K, V> {
    /// Creates an entry that is not yet linked into any list.
    #[inline]
    pub fn new(value: V, cost: u64) -> Self {
        Self {
            value,
            cost,
            prev: None,
            next: None,
        }
    }

    /// Creates an entry that will be appended after `prev`.
    #[inline]
    pub(crate) fn linked_after(value: V, cost: u64, prev: Option<K>) -> Self {
        Self {
            value,
            cost,
            prev,
            next: None,
        }
    }

    /// Returns the key of the older neighbour.
    #[inline]
    pub fn prev(&self) -> Option<&K> {
        self.prev.as_ref()
    }

    /// Returns the key of the newer neighbour.
    #[inline]
    pub fn next(&self) -> Option<&K> {
        self.next.as_ref()
    }

    /// Returns `true` if the entry has no neighbours.
    ///
    /// A detached entry is either not in a list or the only entry of one.
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }

    /// Splits the entry into its value, cost and links.
    #[inline]
    pub(crate) fn into_parts(self) -> (V, u64, Option<K>, Option<K>) {
        (self.value, self.cost, self.prev, self.next)
    }
}

impl<K: Clone, V: Clone> Clone for CacheEntry<K, V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            cost: self.cost,
            prev: self.prev.clone(),
            next: self.next.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CacheEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("value", &self.value)
            .field("cost", &self.cost)
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use super::*;
    use alloc::format;
    use alloc::vec;

    #[test]
    fn test_new_entry() {
        let entry: CacheEntry<&str, i32> = CacheEntry::new(42, 1);
        assert_eq!(entry.value, 42);
        assert_eq!(entry.cost, 1);
        assert!(entry.prev().is_none());
        assert!(entry.next().is_none());
        assert!(entry.is_detached());
    }

    #[test]
    fn test_linked_after() {
        let entry = CacheEntry::linked_after("value", 5, Some("older"));
        assert_eq!(entry.prev(), Some(&"older"));
        assert_eq!(entry.next(), None);
        assert!(!entry.is_detached());
    }

    #[test]
    fn test_into_parts() {
        let mut entry = CacheEntry::linked_after(vec![1, 2, 3], 3, Some(1u32));
        entry.next = Some(3);
        let (value, cost, prev, next) = entry.into_parts();
        assert_eq!(value, vec![1, 2, 3]);
        assert_eq!(cost, 3);
        assert_eq!(prev, Some(1));
        assert_eq!(next, Some(3));
    }

    #[test]
    fn test_clone_entry() {
        let entry = CacheEntry::linked_after(vec![1, 2, 3], 3, Some("prev"));
        let cloned = entry.clone();

        assert_eq!(cloned.value, entry.value);
        assert_eq!(cloned.cost, entry.cost);
        assert_eq!(cloned.prev, entry.prev);
        assert_eq!(cloned.next, entry.next);
    }

    #[test]
    fn test_debug_impl() {
        let entry: CacheEntry<&str, i32> = CacheEntry::new(42, 7);
        let debug_str = format!("{:?}", entry);
        assert!(debug_str.contains("CacheEntry"));
        assert!(debug_str.contains("42"));
        assert!(debug_str.contains("cost: 7"));
    }
}
