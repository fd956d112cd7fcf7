//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{compute_expiry, is_expired, CacheEntry};
pub use lru::LruTracker;
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
