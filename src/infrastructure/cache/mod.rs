//! Caching layer for fast redirect lookups.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache with jittered TTLs
//! - [`NullCache`] - Always-miss implementation for disabled caching
//!
//! The cache is never authoritative: uniqueness and ownership decisions go
//! to the durable store. Entries are not invalidated on delete and may keep
//! resolving until their TTL lapses.

mod null_cache;
mod redis_cache;
mod service;
mod ttl;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
pub use ttl::TtlPolicy;

#[cfg(test)]
pub use service::MockCacheService;
