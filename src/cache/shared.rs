//! Shared Cache Module
//!
//! Thread-safe cache handle: one lock around the store, plus the optional
//! janitor performing active expiration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::Janitor;

// == Cache ==
/// In-process key/value cache with LRU eviction and per-entry TTL.
///
/// Every operation that can reorder entries (including [`get`](Cache::get),
/// since a hit moves the key to the front) takes the lock exclusively.
/// Read-only views like [`stats`](Cache::stats) share it.
///
/// Share a cache between tasks by wrapping it in an [`Arc`].
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use tempus_cache::{Cache, CacheConfig};
///
/// # async fn demo() -> tempus_cache::error::Result<()> {
/// let cache = Cache::new(
///     CacheConfig::new()
///         .with_max_entries(1_000)
///         .with_cleanup_interval(Duration::from_secs(30)),
/// )?;
///
/// cache.set("session:42", "alice".to_string(), Duration::from_secs(300)).await;
/// assert_eq!(cache.get("session:42").await.as_deref(), Some("alice"));
///
/// cache.stop().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
    janitor: Mutex<Option<Janitor>>,
    stopped: AtomicBool,
    config: CacheConfig,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache and, if the config enables it, starts the janitor.
    ///
    /// # Errors
    /// Returns [`CacheError::RuntimeUnavailable`](crate::error::CacheError)
    /// when a cleanup interval is set but no Tokio runtime is running.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let store = Arc::new(RwLock::new(CacheStore::new(config.max_entries)));

        let janitor = match config.janitor_interval() {
            Some(interval) => Some(Janitor::spawn(store.clone(), interval)?),
            None => None,
        };

        info!(
            max_entries = config.max_entries,
            janitor = janitor.is_some(),
            "Cache initialized"
        );

        Ok(Self {
            store,
            janitor: Mutex::new(janitor),
            stopped: AtomicBool::new(false),
            config,
        })
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value and expiry.
    ///
    /// `ttl == Duration::ZERO` means the entry never expires. It does NOT
    /// mean "expire immediately".
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.store.write().await.set(key.into(), value, ttl);
    }

    // == Get ==
    /// Returns a clone of the value for `key`, or None if it is absent or
    /// expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    // == Delete ==
    /// Removes `key`. Returns false, without touching statistics, if it was
    /// not present.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    // == Stats ==
    /// Returns a consistent snapshot of the hit, miss and eviction counters.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Purge Expired ==
    /// Runs one active expiration sweep now. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    /// Number of stored entries, counting expired ones not yet reclaimed.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Keys from most to least recently used.
    pub async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys()
    }

    // == Stop ==
    /// Stops the janitor and waits for it to exit.
    ///
    /// Idempotent. The cache stays usable afterwards; only active expiration
    /// ceases, lazy expiration on reads still applies.
    pub async fn stop(&self) {
        // Held across the join so concurrent callers also wait for the exit
        let mut janitor = self.janitor.lock().await;
        if let Some(janitor) = janitor.take() {
            janitor.stop().await;
        }
        if !self.stopped.swap(true, Ordering::AcqRel) {
            info!("Cache stopped");
        }
    }

    /// Returns true once [`stop`](Cache::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}
