//! Link creation, resolution and lifecycle service.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};

/// Number of generated candidates tried before creation fails.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Service-level settings supplied by configuration.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Prefix of returned short links, e.g. `https://s.example.com`.
    pub base_url: String,
    /// Lifetime applied when a creation request carries no duration.
    /// `None` means such links never expire.
    pub default_lifetime: Option<Duration>,
}

/// A freshly created link together with its public URL.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: Link,
    pub short_url: String,
}

/// Orchestrates code allocation, cache-aside resolution and link lifecycle.
///
/// The durable store is authoritative for existence, ownership and
/// uniqueness; the cache only accelerates reads. Code allocation is
/// optimistic: availability is checked without locking and the store's
/// unique constraint settles races at insert time.
pub struct LinkService<L, C>
where
    L: LinkRepository + ?Sized,
    C: CacheService + ?Sized,
{
    link_repository: Arc<L>,
    cache: Arc<C>,
    code_generator: Arc<dyn CodeGenerator>,
    settings: LinkSettings,
}

impl<L, C> LinkService<L, C>
where
    L: LinkRepository + ?Sized,
    C: CacheService + ?Sized,
{
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<L>,
        cache: Arc<C>,
        code_generator: Arc<dyn CodeGenerator>,
        settings: LinkSettings,
    ) -> Self {
        Self {
            link_repository,
            cache,
            code_generator,
            settings,
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - Destination URL (validated by the caller)
    /// - `custom_code` - Optional code requested by the creator
    /// - `duration` - Optional lifetime; falls back to the configured default
    /// - `created_by` - Owner name when the creator is authenticated
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the custom code is malformed or `duration` is not positive
    /// - [`AppError::CodeTaken`] if the custom code is held by a live link
    /// - [`AppError::CodeGenerationExhausted`] if every generated candidate collided
    /// - [`AppError::Conflict`] if a concurrent creation claimed the code first
    /// - [`AppError::Cache`] if the link was stored but seeding the cache failed;
    ///   the link exists and will be served from the database
    pub async fn create_link(
        &self,
        original_url: String,
        custom_code: Option<String>,
        duration: Option<Duration>,
        created_by: Option<String>,
    ) -> Result<CreatedLink, AppError> {
        let expires_at = self.compute_expiry(Utc::now(), duration)?;

        let (code, is_custom) = match custom_code {
            Some(custom) => (self.claim_custom_code(custom).await?, true),
            None => (self.generate_unique_code().await?, false),
        };

        let link = self
            .link_repository
            .insert(NewLink {
                code,
                original_url,
                is_custom,
                expires_at,
                created_by,
            })
            .await?;

        info!(
            id = link.id,
            code = %link.code,
            is_custom,
            expires_at = ?link.expires_at,
            "Short link created"
        );

        self.cache.put(&link).await?;

        let short_url = self.short_url(&link.code);
        Ok(CreatedLink { link, short_url })
    }

    /// Resolves a short code to its original URL.
    ///
    /// Checks the cache first and only touches the database on a miss, in which
    /// case the cache is backfilled before returning. Links past `expires_at`
    /// still resolve until the sweep deletes them.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link holds the code
    /// - [`AppError::Cache`] if the cache lookup or backfill fails
    /// - [`AppError::Store`] on database errors
    pub async fn resolve_link(&self, code: &str) -> Result<String, AppError> {
        if let Some(cached) = self.cache.get(code).await? {
            debug!(code, "Resolved from cache");
            return Ok(cached.original_url);
        }

        let link = self.link_repository.get_by_code(code).await?;
        self.cache.put(&link).await?;

        debug!(code, "Resolved from database");
        Ok(link.original_url)
    }

    /// Lists links created by `owner`, oldest first.
    ///
    /// `page` is 1-based; `page == 0` is treated as the first page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    pub async fn list_links_for_owner(
        &self,
        owner: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Link>, AppError> {
        let limit = i64::from(per_page);
        let offset = i64::from(page.saturating_sub(1)) * limit;

        self.link_repository
            .list_by_owner(owner, limit, offset)
            .await
    }

    /// Deletes a link owned by `owner`.
    ///
    /// The cached snapshot is not invalidated and may keep resolving until
    /// its TTL lapses.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or is owned by someone else.
    pub async fn delete_link(&self, id: i64, owner: &str) -> Result<(), AppError> {
        self.link_repository.delete_by_id(id, owner).await?;
        info!(id, owner, "Short link deleted");
        Ok(())
    }

    /// Deletes every link past its expiry; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    pub async fn sweep_expired(&self) -> Result<u64, AppError> {
        self.link_repository.sweep_expired().await
    }

    /// Reports whether the database and the cache are reachable.
    pub async fn check_health(&self) -> (Result<(), AppError>, bool) {
        let database = self.link_repository.ping().await;
        let cache = self.cache.health_check().await;
        (database, cache)
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), code)
    }

    /// Validates a custom code and checks that no live link holds it.
    async fn claim_custom_code(&self, code: String) -> Result<String, AppError> {
        validate_custom_code(&code)?;

        if !self.link_repository.is_code_available(&code).await? {
            return Err(AppError::CodeTaken { code });
        }

        Ok(code)
    }

    /// Draws candidates until one is available, up to [`MAX_GENERATION_ATTEMPTS`].
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = self.code_generator.generate();

            if self.link_repository.is_code_available(&code).await? {
                return Ok(code);
            }

            debug!(attempt, code, "Generated code collided");
        }

        Err(AppError::CodeGenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    fn compute_expiry(
        &self,
        now: DateTime<Utc>,
        duration: Option<Duration>,
    ) -> Result<Option<DateTime<Utc>>, AppError> {
        match duration {
            Some(d) if d <= Duration::zero() => Err(AppError::bad_request(
                "Duration must be positive",
                json!({ "duration_seconds": d.num_seconds() }),
            )),
            Some(d) => offset_from(now, d).map(Some),
            None => self
                .settings
                .default_lifetime
                .map(|d| offset_from(now, d))
                .transpose(),
        }
    }
}

fn offset_from(now: DateTime<Utc>, lifetime: Duration) -> Result<DateTime<Utc>, AppError> {
    now.checked_add_signed(lifetime).ok_or_else(|| {
        AppError::bad_request(
            "Link lifetime is out of range",
            json!({ "duration_seconds": lifetime.num_seconds() }),
        )
    })
}
