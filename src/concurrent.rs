//! Concurrent Cache Implementation
//!
//! This module provides the thread-safe FIFO cost cache.
//!
//! # Architecture
//!
//! [`ConcurrentFifoCache`] wraps a single eviction engine in one
//! `parking_lot::Mutex`. Every public operation acquires the lock for its whole
//! duration and releases it when the guard drops, on every exit path.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  ConcurrentFifoCache                     │
//! │                                                          │
//! │   callers ──┐                      ┌── SignalHub         │
//! │   callers ──┼──▶  Arc<Mutex<  ◀────┤   (memory pressure) │
//! │   callers ──┘     FifoSegment>>    └── SignalHub         │
//! │                                        (background)      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why One Lock Instead of Segments?
//!
//! Eviction order is a single global sequence: the head is always the oldest
//! write across *all* keys. Partitioning keys over several locked segments would
//! make that order per-segment, so the cache keeps one lock and one list. Every
//! operation is O(1) apart from trims, whose work is bounded by earlier inserts.
//!
//! ## Why Mutex Instead of RwLock?
//!
//! Reads record hit/miss metrics, so `get` needs mutable access to the engine.
//! `parking_lot::Mutex` is cheap when uncontended.
//!
//! ## Lock Failure
//!
//! `parking_lot` locks do not poison. A panic inside a
//! [`get_with`](ConcurrentFifoCache::get_with) closure unwinds through the guard
//! and releases the lock; the closure only sees `&V`, so the engine stays
//! consistent.
//!
//! # Thread Safety
//!
//! `ConcurrentFifoCache` is `Send + Sync` when its keys, values and hasher are
//! `Send`, and can be shared via `Arc`.
//!
//! # Example
//!
//! ```rust
//! use fifo_cost_cache::ConcurrentFifoCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentFifoCache::with_limits(Some(1000), None));
//!
//! let handles: Vec<_> = (0..4).map(|t| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for i in 0..1000 {
//!             let key = format!("key_{}_{}", t, i);
//!             cache.put(key.clone(), i);
//!             let _ = cache.get(&key);
//!         }
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(cache.len(), 1000);
//! ```

mod fifo;

pub use self::fifo::ConcurrentFifoCache;
