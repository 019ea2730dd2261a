//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: database and cache reachable
/// - **503 Service Unavailable**: at least one component failed
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "ok", "message": "Reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (database, cache) = state.link_service.check_health().await;

    let database = match database {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            CheckStatus::error("Database unreachable")
        }
    };
    let cache = if cache {
        CheckStatus::ok("Reachable")
    } else {
        CheckStatus::error("Cache unreachable")
    };

    let all_healthy = database.is_ok() && cache.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database, cache },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
