//! Cache Entry Module
//!
//! Defines the stored unit and the expiration policy shared by the lazy
//! (read path) and active (janitor) expiration strategies.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V> {
    /// The key this entry is indexed under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Absolute expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with an already computed expiry.
    pub fn new(key: String, value: V, expires_at: Option<Instant>) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now >= expires_at`, so a TTL that has fully
    /// elapsed is never served.
    pub fn is_expired(&self, now: Instant) -> bool {
        is_expired(self, now)
    }

    // == Time To Live ==
    /// Returns the time left before expiry, or None if the entry never expires.
    ///
    /// Returns `Some(Duration::ZERO)` once the entry has expired.
    pub fn ttl_remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(now))
    }
}

// == Expiration Policy ==
/// Returns true iff the entry carries an expiry and `now` has reached it.
pub fn is_expired<V>(entry: &CacheEntry<V>, now: Instant) -> bool {
    match entry.expires_at {
        Some(expires) => now >= expires,
        None => false,
    }
}

/// Computes the absolute expiry for a TTL measured from `now`.
///
/// A zero TTL is the "never expires" sentinel, not an instruction to expire
/// immediately. A TTL too large to represent is also treated as never.
pub fn compute_expiry(now: Instant, ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() {
        None
    } else {
        now.checked_add(ttl)
    }
}
