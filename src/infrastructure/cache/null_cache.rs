//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that stores nothing.
///
/// Every lookup is a miss, so every resolution goes to the database.
/// Used when Redis is not configured or unreachable at start-up.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _code: &str) -> CacheResult<Option<Link>> {
        Ok(None)
    }

    async fn put(&self, _link: &Link) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
