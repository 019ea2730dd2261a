//! Link entity representing a short code to URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted short link.
///
/// This is the unit of truth stored in PostgreSQL. The cache layer stores
/// JSON snapshots of this struct, so it derives `Serialize`/`Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub is_custom: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if `expires_at` is set and not after `now`.
    ///
    /// Expired links stay resolvable until the sweep deletes them.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Returns true if `owner` created this link.
    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.created_by.as_deref() == Some(owner)
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub original_url: String,
    pub is_custom: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}
