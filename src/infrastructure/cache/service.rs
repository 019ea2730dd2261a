//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Link;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Ephemeral store of link snapshots keyed by short code.
///
/// Errors are returned to the caller rather than swallowed; the link service
/// surfaces them so that a cache outage is visible instead of silently
/// shifting all traffic to the database.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached snapshot for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend is unreachable or the stored
    /// value cannot be decoded.
    async fn get(&self, code: &str) -> CacheResult<Option<Link>>;

    /// Stores a snapshot of `link` under its code.
    ///
    /// The TTL is chosen by the implementation (see [`super::TtlPolicy`]) and
    /// never outlives `link.expires_at`. A link that is already expired is
    /// not written.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if serialization or the write fails.
    async fn put(&self, link: &Link) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
