//! Cache Store Module
//!
//! Main cache engine combining the LRU tracker with TTL expiration and
//! statistics. The store itself is not synchronized; [`Cache`](crate::Cache)
//! wraps it in a single lock so every operation here runs as one critical
//! section.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use crate::cache::entry::{compute_expiry, CacheEntry};
use crate::cache::{CacheStats, LruTracker};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Entries indexed by key and ordered by recency
    lru: LruTracker<V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed, 0 = unbounded
    max_entries: usize,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore. A `max_entries` of 0 disables eviction.
    pub fn new(max_entries: usize) -> Self {
        Self {
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, the value and expiry are replaced in place
    /// and the key becomes most recently used. Otherwise, if the cache is at
    /// capacity, the least recently used entry is evicted first.
    ///
    /// A `ttl` of `Duration::ZERO` means the entry never expires.
    pub fn set(&mut self, key: String, value: V, ttl: Duration) {
        let expires_at = compute_expiry(Instant::now(), ttl);

        if let Some(entry) = self.lru.get_mut(&key) {
            entry.value = value;
            entry.expires_at = expires_at;
            self.lru.touch(&key);
            return;
        }

        if self.max_entries > 0 && self.lru.len() >= self.max_entries {
            let evicted = self.lru.remove_tail();
            debug_assert!(evicted.is_some(), "cache at capacity but recency list empty");
            if let Some(evicted) = evicted {
                self.stats.record_eviction();
                debug!(key = %evicted.key, "Evicted least recently used entry");
            }
        }

        self.lru.insert_front(CacheEntry::new(key, value, expires_at));
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// A hit moves the key to the front. An expired entry is removed on the
    /// spot and counted as a miss, so a value is never served past its TTL.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();

        let expired = match self.lru.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.lru.remove(key);
            self.stats.record_miss();
            trace!(key, "Removed expired entry on read");
            return None;
        }

        self.lru.touch(key);
        self.stats.record_hit();
        self.lru.get(key).map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns true if an entry was removed. Deleting a missing key is a
    /// no-op and leaves the statistics untouched.
    pub fn delete(&mut self, key: &str) -> bool {
        self.lru.remove(key).is_some()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.lru.remove_expired(Instant::now())
    }

    // == Keys ==
    /// Returns all keys ordered from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.lru.iter().map(|entry| entry.key.clone()).collect()
    }

    // == Length ==
    /// Returns the current number of entries, including expired entries
    /// not yet reclaimed.
    pub fn len(&self) -> usize {
        self.lru.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.lru.is_consistent()
    }
}
