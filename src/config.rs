//! Cache Configuration Module
//!
//! This module provides the configuration structure for the FIFO cost cache.
//!
//! # Design Philosophy
//!
//! The configuration struct has all public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Type safety**: Limits are unsigned, so a negative limit cannot be expressed
//! - **Unbounded by default**: `None` means the limit is not enforced
//!
//! # Limits
//!
//! - **`count_limit`**: Maximum number of entries. After every insert the cache
//!   evicts from the head until `len() <= count_limit`.
//! - **`cost_limit`**: Maximum sum of the caller-supplied entry costs. After every
//!   insert the cache evicts from the head until `total_cost() <= cost_limit`.
//!
//! Both limits are applied after every insert, count first and then cost. Each
//! trim only removes entries, so the order does not change the final state.
//!
//! # Signed Inputs
//!
//! Hosts that carry limits or costs as signed integers (for example, values read
//! from a platform API) normalize them with [`FifoCacheConfig::from_signed`] and
//! [`clamp_cost`]. Negative values are clamped to zero rather than rejected.
//!
//! # Examples
//!
//! ```
//! use fifo_cost_cache::config::FifoCacheConfig;
//! use fifo_cost_cache::FifoCache;
//!
//! // At most 1000 entries, at most 10MB of accounted cost
//! let config = FifoCacheConfig {
//!     count_limit: Some(1000),
//!     cost_limit: Some(10 * 1024 * 1024),
//! };
//! let cache: FifoCache<String, Vec<u8>> = FifoCache::init(config, None);
//! assert_eq!(cache.count_limit(), Some(1000));
//! ```

use core::fmt;

/// Configuration for a FIFO cost cache.
///
/// # Fields
///
/// - `count_limit`: Maximum number of entries, or `None` for no count limit.
/// - `cost_limit`: Maximum total cost, or `None` for no cost limit.
///
/// # Examples
///
/// ```
/// use fifo_cost_cache::config::FifoCacheConfig;
///
/// let unbounded = FifoCacheConfig::default();
/// assert_eq!(unbounded.count_limit, None);
/// assert_eq!(unbounded.cost_limit, None);
///
/// let bounded = FifoCacheConfig::with_limits(Some(50), Some(500));
/// assert_eq!(bounded.count_limit, Some(50));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoCacheConfig {
    /// Maximum number of entries the cache may hold after an insert completes.
    pub count_limit: Option<usize>,
    /// Maximum total cost the cache may hold after an insert completes.
    pub cost_limit: Option<u64>,
}

impl FifoCacheConfig {
    /// Creates a configuration from optional unsigned limits.
    #[inline]
    pub const fn with_limits(count_limit: Option<usize>, cost_limit: Option<u64>) -> Self {
        Self {
            count_limit,
            cost_limit,
        }
    }

    /// Creates a configuration from optional signed limits.
    ///
    /// Negative limits are clamped to zero. A zero limit is legal and means the
    /// cache evicts everything it is given.
    ///
    /// ```
    /// use fifo_cost_cache::config::FifoCacheConfig;
    ///
    /// let config = FifoCacheConfig::from_signed(Some(-5), Some(20));
    /// assert_eq!(config.count_limit, Some(0));
    /// assert_eq!(config.cost_limit, Some(20));
    /// ```
    pub fn from_signed(count_limit: Option<i64>, cost_limit: Option<i64>) -> Self {
        Self {
            count_limit: count_limit
                .map(|limit| usize::try_from(limit.max(0)).unwrap_or(usize::MAX)),
            cost_limit: cost_limit.map(clamp_cost),
        }
    }

    /// Returns `true` if neither limit is set.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.count_limit.is_none() && self.cost_limit.is_none()
    }
}

/// Normalizes a signed cost to the unsigned cost the cache accounts with.
///
/// Negative costs are clamped to zero.
///
/// ```
/// use fifo_cost_cache::config::clamp_cost;
///
/// assert_eq!(clamp_cost(-3), 0);
/// assert_eq!(clamp_cost(42), 42);
/// ```
#[inline]
pub fn clamp_cost(cost: i64) -> u64 {
    u64::try_from(cost).unwrap_or(0)
}

impl fmt::Debug for FifoCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCacheConfig")
            .field("count_limit", &self.count_limit)
            .field("cost_limit", &self.cost_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_config_creation() {
        let config = FifoCacheConfig {
            count_limit: Some(1000),
            cost_limit: Some(10 * 1024 * 1024),
        };
        assert_eq!(config.count_limit, Some(1000));
        assert_eq!(config.cost_limit, Some(10 * 1024 * 1024));
        assert!(!config.is_unbounded());
    }

    #[test]
    fn test_fifo_config_default_is_unbounded() {
        let config = FifoCacheConfig::default();
        assert!(config.is_unbounded());
        assert_eq!(config, FifoCacheConfig::with_limits(None, None));
    }

    #[test]
    fn test_fifo_config_from_signed_clamps_negatives() {
        let config = FifoCacheConfig::from_signed(Some(-1), Some(-100));
        assert_eq!(config.count_limit, Some(0));
        assert_eq!(config.cost_limit, Some(0));

        let config = FifoCacheConfig::from_signed(None, Some(15));
        assert_eq!(config.count_limit, None);
        assert_eq!(config.cost_limit, Some(15));
    }

    #[test]
    fn test_clamp_cost() {
        assert_eq!(clamp_cost(i64::MIN), 0);
        assert_eq!(clamp_cost(0), 0);
        assert_eq!(clamp_cost(i64::MAX), i64::MAX as u64);
    }
}
