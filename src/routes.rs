//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect (public)
//! - `GET  /health`   - Health check: database and cache (public)
//! - `POST /shorten`  - Anonymous link creation (public)
//! - `/api/*`         - Owner API (Bearer token required)

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/api/links/` reaches the
/// same handler as `/api/links`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/shorten", post(shorten_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
