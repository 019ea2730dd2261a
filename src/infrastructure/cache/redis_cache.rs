//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use super::ttl::TtlPolicy;
use crate::domain::entities::Link;
use async_trait::async_trait;
use chrono::Utc;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

/// Redis cache storing JSON link snapshots under `url:{code}`.
///
/// Uses a `ConnectionManager`, which reconnects transparently and is cheap to
/// clone per call. Every failure is returned to the caller.
pub struct RedisCache {
    client: ConnectionManager,
    ttl_policy: TtlPolicy,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `ttl_policy` - TTL policy applied on every [`CacheService::put`];
    ///   its average is controlled via the `CACHE_TTL_SECONDS` env var
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, ttl_policy: TtlPolicy) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!(
            average_ttl_secs = ttl_policy.average().as_secs(),
            "Connected to Redis"
        );

        Ok(Self {
            client: manager,
            ttl_policy,
            key_prefix: "url:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, code: &str) -> CacheResult<Option<Link>> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        let raw = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", key, e)))?;

        match raw {
            Some(raw) => {
                debug!(code, "Cache HIT");
                Ok(Some(serde_json::from_str(&raw)?))
            }
            None => {
                debug!(code, "Cache MISS");
                Ok(None)
            }
        }
    }

    async fn put(&self, link: &Link) -> CacheResult<()> {
        let Some(ttl) = self.ttl_policy.ttl_for(link, Utc::now()) else {
            debug!(code = %link.code, "Link already expired, not caching");
            return Ok(());
        };

        let key = self.build_key(&link.code);
        let payload = serde_json::to_string(link)?;
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let mut conn = self.client.clone();

        conn.pset_ex::<_, _, ()>(&key, payload, ttl_ms)
            .await
            .map_err(|e| CacheError::OperationError(format!("PSETEX {}: {}", key, e)))?;

        debug!(code = %link.code, ttl_ms, "Cache SET");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
