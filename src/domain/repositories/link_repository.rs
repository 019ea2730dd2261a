//! Repository trait for durable link storage.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store for short links; the single source of truth.
///
/// The store alone enforces code uniqueness. [`Self::is_code_available`] is an
/// optimization for callers; [`Self::insert`] must still reject a duplicate
/// code that slipped past the check.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns true if no live record holds `code`.
    ///
    /// A record whose `expires_at` is at or before now is not live: its code
    /// may be reclaimed by [`Self::insert`] before the sweep removes it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn is_code_available(&self, code: &str) -> Result<bool, AppError>;

    /// Persists a new link, reclaiming an expired record with the same code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a live record already holds the code.
    /// Returns [`AppError::Store`] on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Looks up a link by code.
    ///
    /// Expired records are returned until the sweep deletes them.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record holds the code.
    /// Returns [`AppError::Store`] on database errors.
    async fn get_by_code(&self, code: &str) -> Result<Link, AppError>;

    /// Lists links created by `owner` in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn list_by_owner(
        &self,
        owner: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Deletes a link if and only if `owner` created it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or belongs to
    /// someone else. Returns [`AppError::Store`] on database errors.
    async fn delete_by_id(&self, id: i64, owner: &str) -> Result<(), AppError>;

    /// Deletes every link whose `expires_at` is at or before now.
    ///
    /// Returns the number of deleted records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn sweep_expired(&self) -> Result<u64, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the round trip fails.
    async fn ping(&self) -> Result<(), AppError>;
}
