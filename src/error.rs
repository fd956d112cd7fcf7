//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Lookups and deletes never fail: absence is reported through `Option`
/// and `bool`. The only fallible path is construction.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A cleanup interval was configured but no Tokio runtime is available
    /// to host the janitor task
    #[error("Tokio runtime unavailable: {0}")]
    RuntimeUnavailable(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
