//! Resource Signals
//!
//! Hosts tell caches to drop everything when the process is under memory
//! pressure or when the application moves to the background. The cache does
//! not talk to the platform itself: it subscribes to any number of
//! [`ResourceSignal`] sources handed to it at construction and unsubscribes
//! when it is dropped.
//!
//! [`SignalHub`] is an in-process source. Platform glue code owns a hub and
//! calls [`SignalHub::notify`] from its memory-pressure or lifecycle callback.
//!
//! ```
//! use fifo_cost_cache::config::FifoCacheConfig;
//! use fifo_cost_cache::signal::{ResourceSignal, SignalHub, SignalKind};
//! use fifo_cost_cache::ConcurrentFifoCache;
//! use std::sync::Arc;
//!
//! let hub = Arc::new(SignalHub::new());
//! let cache: ConcurrentFifoCache<String, u32> = ConcurrentFifoCache::with_signals(
//!     FifoCacheConfig::default(),
//!     [Arc::clone(&hub) as Arc<dyn ResourceSignal>],
//! );
//!
//! cache.put("a".to_string(), 1);
//! hub.notify(SignalKind::MemoryPressure);
//! assert!(cache.is_empty());
//! ```
//!
//! # Delivery
//!
//! Handlers run on whatever thread calls `notify`. A handler must not be
//! triggered from inside a closure passed to
//! [`ConcurrentFifoCache::get_with`](crate::ConcurrentFifoCache::get_with) on
//! the same cache, because the cache lock is not reentrant.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use parking_lot::Mutex;
use tracing::trace;

/// Why a source is asking its subscribers to release memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// The system reported low available memory.
    MemoryPressure,
    /// The application was hidden, minimized or moved to the background.
    Background,
}

/// Handle returned by [`ResourceSignal::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wraps a source-specific identifier. Ids only need to be unique within
    /// one source.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Callback invoked when a source fires.
pub type SignalHandler = Arc<dyn Fn(SignalKind) + Send + Sync>;

/// A source of "release memory now" notifications.
pub trait ResourceSignal: Send + Sync {
    /// Registers `handler` and returns an identifier for later removal.
    fn subscribe(&self, handler: SignalHandler) -> SubscriptionId;

    /// Removes a handler. Returns `false` if `id` was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// In-process [`ResourceSignal`] that fans a notification out to every
/// subscriber.
pub struct SignalHub {
    handlers: Mutex<Vec<(SubscriptionId, SignalHandler)>>,
    next_id: AtomicU64,
}

impl SignalHub {
    /// Creates a hub with no subscribers.
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Calls every subscribed handler with `kind` and returns how many ran.
    ///
    /// Handlers are called after the subscriber list lock is released, so a
    /// handler may subscribe or unsubscribe without deadlocking.
    pub fn notify(&self, kind: SignalKind) -> usize {
        let handlers: Vec<SignalHandler> = self
            .handlers
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        trace!(?kind, subscribers = handlers.len(), "delivering resource signal");
        for handler in &handlers {
            handler(kind);
        }
        handlers.len()
    }

    /// Returns the number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.lock().len()
    }
}

impl Default for SignalHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSignal for SignalHub {
    fn subscribe(&self, handler: SignalHandler) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        handlers.retain(|(subscribed, _)| *subscribed != id);
        handlers.len() != before
    }
}

impl fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicUsize;

    #[test]
    fn test_notify_reaches_every_subscriber() {
        let hub = SignalHub::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            hub.subscribe(Arc::new(move |_: SignalKind| {
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert_eq!(hub.notify(SignalKind::MemoryPressure), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let hub = SignalHub::new();
        let first = hub.subscribe(Arc::new(|_: SignalKind| {}));
        let second = hub.subscribe(Arc::new(|_: SignalKind| {}));
        assert_ne!(first, second);
        assert_eq!(hub.subscriber_count(), 2);

        assert!(hub.unsubscribe(first));
        assert!(!hub.unsubscribe(first));
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(hub.notify(SignalKind::Background), 1);
    }

    #[test]
    fn test_handler_may_unsubscribe_itself() {
        let hub = Arc::new(SignalHub::new());
        let slot = Arc::new(Mutex::new(None::<SubscriptionId>));

        let handler_hub = Arc::clone(&hub);
        let handler_slot = Arc::clone(&slot);
        let id = hub.subscribe(Arc::new(move |_: SignalKind| {
            if let Some(id) = handler_slot.lock().take() {
                handler_hub.unsubscribe(id);
            }
        }));
        *slot.lock() = Some(id);

        assert_eq!(hub.notify(SignalKind::Background), 1);
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.notify(SignalKind::Background), 0);
    }

    #[test]
    fn test_handler_receives_kind() {
        let hub = SignalHub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        hub.subscribe(Arc::new(move |kind: SignalKind| sink.lock().push(kind)));

        hub.notify(SignalKind::MemoryPressure);
        hub.notify(SignalKind::Background);
        assert_eq!(
            *seen.lock(),
            [SignalKind::MemoryPressure, SignalKind::Background]
        );
    }
}
