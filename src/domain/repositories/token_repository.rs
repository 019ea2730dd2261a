//! Repository trait for API token authentication.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// API token entity with metadata.
///
/// Only the HMAC of the raw token is stored. The token `name` doubles as the
/// owner identity attached to links created with it.
#[derive(Debug, Clone, FromRow)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Repository interface for API token management.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Resolves a token hash to the owning token's name.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(name))` if the token exists and is not revoked
    /// - `Ok(None)` if the token is unknown or revoked
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn find_active_owner(&self, token_hash: &str) -> Result<Option<String>, AppError>;

    /// Updates the `last_used_at` timestamp for a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Creates a new API token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name or hash is already used.
    /// Returns [`AppError::Store`] on database errors.
    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError>;

    /// Lists all tokens, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError>;

    /// Finds a token by its database ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError>;

    /// Finds a token by its name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError>;

    /// Revokes a token, preventing further authentication.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token does not exist.
    /// Returns [`AppError::Store`] on database errors.
    async fn revoke_token(&self, id: i64) -> Result<(), AppError>;
}
