//! Local disk cache for GitHub responses
//!
//! One JSON file per logical key with a fixed TTL. Every fetch made by the
//! [`SourceClient`] is cache-first so repeated analyses of the same user stay
//! well inside the upstream quota.

pub mod client;
pub mod key;
pub mod storage;

use std::time::Duration;

/// Cache TTL configuration
pub struct CacheTtl;

impl CacheTtl {
    /// Profiles, repositories and issues all share one freshness window
    pub const DEFAULT: Duration = Duration::from_secs(60 * 60); // 1 hr
}

// Re-export main types
pub use client::{Fetched, SourceClient};
pub use key::keys;
pub use storage::CacheStorage;
