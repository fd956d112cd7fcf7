//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a cache.
//!
//! # Tasks
//! - TTL Janitor: Removes expired cache entries at a configured interval

mod janitor;

pub use janitor::Janitor;
