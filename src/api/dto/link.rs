//! DTOs for link creation and listing.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::domain::entities::Link;

/// Longest accepted link lifetime, in hours (30 days).
pub const MAX_DURATION_HOURS: u32 = 720;

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

/// Rejects anything but absolute `http`/`https` URLs with a host.
fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(value).map_err(|_| ValidationError::new("invalid_url"))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(ValidationError::new("unsupported_scheme")
            .with_message("Only http and https URLs can be shortened".into())),
    }
}

/// Request to create a short link.
///
/// ```json
/// { "url": "https://example.com/a/long/path", "custom_code": "Promo24", "duration": 24 }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(
        url(message = "Invalid URL format"),
        custom(function = "validate_http_url")
    )]
    pub url: String,

    /// Optional custom short code, 4-10 ASCII letters and digits.
    #[validate(
        length(min = 4, max = 10, message = "Custom code must be 4-10 characters"),
        regex(path = "*CUSTOM_CODE_REGEX", message = "Custom code can only contain letters and digits")
    )]
    pub custom_code: Option<String>,

    /// Lifetime in hours. Absent means the server default.
    #[validate(range(min = 1, max = MAX_DURATION_HOURS, message = "Duration must be 1-720 hours"))]
    pub duration: Option<u32>,
}

impl CreateLinkRequest {
    pub fn lifetime(&self) -> Option<chrono::Duration> {
        self.duration
            .map(|hours| chrono::Duration::hours(i64::from(hours)))
    }
}

/// Returned with `201 Created` after a link is stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    pub code: String,
    pub short_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A link as seen by its owner.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub is_custom: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            short_url,
            original_url: link.original_url,
            is_custom: link.is_custom,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<LinkResponse>,
}
