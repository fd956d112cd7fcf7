//! Configuration Module
//!
//! Settings consumed once by [`Cache::new`](crate::Cache::new).

use std::time::Duration;

/// Longest janitor period honoured. Larger intervals are clamped to it so the
/// first deadline always fits in an `Instant`.
pub const MAX_CLEANUP_INTERVAL: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Cache construction parameters.
///
/// Values are sanitized rather than rejected: a zero capacity means the
/// cache is unbounded and a zero interval disables the background janitor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction, 0 = unbounded
    pub max_entries: usize,
    /// Period of the active expiration sweep, zero = janitor disabled
    pub cleanup_interval: Duration,
}

impl CacheConfig {
    /// Creates a config with no capacity bound and no janitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity bound. `0` leaves the cache unbounded.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the janitor period. `Duration::ZERO` disables the janitor and the
    /// cache relies on lazy expiration alone.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Returns true if LRU eviction is enforced.
    pub fn is_bounded(&self) -> bool {
        self.max_entries > 0
    }

    /// Returns the janitor period, or None when active expiration is off.
    ///
    /// Periods beyond [`MAX_CLEANUP_INTERVAL`] are clamped to it.
    pub fn janitor_interval(&self) -> Option<Duration> {
        (!self.cleanup_interval.is_zero())
            .then(|| self.cleanup_interval.min(MAX_CLEANUP_INTERVAL))
    }
}
