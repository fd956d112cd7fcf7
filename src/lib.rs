//! Tempus Cache - A thread-safe in-process cache
//!
//! Provides key/value storage with TTL expiration and LRU eviction.
//! Expired entries are dropped lazily on read and, optionally, by a
//! background janitor sweeping on a fixed interval.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
