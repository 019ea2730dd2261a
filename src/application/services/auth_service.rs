//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::warn;

use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI uses the
/// same function when issuing tokens, so both sides must share the secret.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the MAC cannot be keyed.
pub fn hash_token(signing_secret: &str, token: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|e| AppError::internal("Invalid signing key", json!({ "reason": e.to_string() })))?;
    mac.update(token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Service for authenticating API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 before lookup; the raw value never
/// reaches the database. A successful lookup yields the token's name, which
/// becomes the owner of any link created with it.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Authenticates a raw token and returns the owner name.
    ///
    /// Refreshing `last_used_at` is best effort; a failure there is logged and
    /// does not reject the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Store`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<String, AppError> {
        let token_hash = hash_token(&self.signing_secret, token)?;

        let Some(owner) = self.repository.find_active_owner(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Invalid or revoked token" }),
            ));
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            warn!(owner = %owner, error = %e, "Failed to update token last_used_at");
        }

        Ok(owner)
    }
}
