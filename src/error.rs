//! Application error type and its HTTP rendering.
//!
//! [`AppError`] is the single error type returned by repositories, services and
//! handlers. Handlers return it directly; [`IntoResponse`] turns it into a JSON
//! body of the form:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short link not found", "details": {} } }
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::infrastructure::cache::CacheError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Request data failed validation before reaching storage.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// No live record matches, or the caller does not own it.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The requested custom code is held by a live record.
    #[error("short code '{code}' is already taken")]
    CodeTaken { code: String },

    /// Every generated candidate collided with a live record.
    #[error("failed to allocate a unique short code after {attempts} attempts")]
    CodeGenerationExhausted { attempts: usize },

    /// A uniqueness constraint rejected the write.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("storage error: {0}")]
    Store(String),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::CodeTaken { .. } | Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::CodeGenerationExhausted { .. }
            | Self::Store(_)
            | Self::Cache(_)
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable payload.
    ///
    /// Storage details are not exposed to clients; they are logged instead.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            Self::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            Self::CodeTaken { code } => ErrorInfo {
                code: "code_taken",
                message: self.to_string(),
                details: json!({ "code": code }),
            },
            Self::CodeGenerationExhausted { attempts } => ErrorInfo {
                code: "code_generation_exhausted",
                message: "Failed to generate a unique short code".to_string(),
                details: json!({ "attempts": attempts }),
            },
            Self::Conflict { message, details } => ErrorInfo {
                code: "conflict",
                message: message.clone(),
                details: details.clone(),
            },
            Self::Unauthorized { message, details } => ErrorInfo {
                code: "unauthorized",
                message: message.clone(),
                details: details.clone(),
            },
            Self::Store(_) => ErrorInfo {
                code: "store_error",
                message: "Database error".to_string(),
                details: json!({}),
            },
            Self::Cache(_) => ErrorInfo {
                code: "cache_error",
                message: "Cache unavailable; a newly created link may already be stored"
                    .to_string(),
                details: json!({}),
            },
            Self::Internal { message, details } => ErrorInfo {
                code: "internal_error",
                message: message.clone(),
                details: details.clone(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::Store(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        AppError::Store(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(e.field_errors()).unwrap_or_default(),
        )
    }
}
