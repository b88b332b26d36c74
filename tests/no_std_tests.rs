#![no_std]
extern crate alloc;
extern crate fifo_cost_cache;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use fifo_cost_cache::config::FifoCacheConfig;
use fifo_cost_cache::FifoCache;

fn make_cache<K: core::hash::Hash + Eq + Clone, V>(
    count_limit: Option<usize>,
    cost_limit: Option<u64>,
) -> FifoCache<K, V> {
    FifoCache::init(FifoCacheConfig::with_limits(count_limit, cost_limit), None)
}

#[test]
fn test_fifo_in_no_std() {
    let mut cache = make_cache(Some(2), None);
    cache.put("a", 1);
    cache.put("b", 2);
    assert_eq!(cache.get(&"a"), Some(&1));
    assert_eq!(cache.get(&"b"), Some(&2));

    cache.put("c", 3);
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"c"), Some(&3));
}

#[test]
fn test_cost_limit_in_no_std() {
    let mut cache = make_cache(None, Some(15));
    cache.put_with_cost("a", 1, 10);
    cache.put_with_cost("b", 2, 10);
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.total_cost(), 10);
}

#[test]
fn test_with_alloc_types() {
    let mut cache: FifoCache<String, Vec<u8>> = make_cache(Some(3), Some(1024));
    for i in 0..8u8 {
        cache.put_with_cost(format!("blob-{}", i), alloc::vec![i; 100], 100);
    }

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.total_cost(), 300);
    let keys: Vec<&str> = cache.keys().map(String::as_str).collect();
    assert_eq!(keys, ["blob-5", "blob-6", "blob-7"]);
    assert_eq!(cache.peek("blob-7").map(|v| v[0]), Some(7));
}

#[test]
fn test_remove_and_clear_in_no_std() {
    let mut cache = make_cache(None, None);
    cache.put_with_cost(1u32, "one", 4);
    cache.put_with_cost(2u32, "two", 6);

    assert_eq!(cache.remove(&1), Some("one"));
    assert_eq!(cache.total_cost(), 6);

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.total_cost(), 0);
}
