//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{create_link_handler, delete_link_handler, list_links_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

/// Owner-scoped API routes.
///
/// # Endpoints
///
/// - `POST   /links`       - Create a link owned by the caller
/// - `GET    /links`       - List the caller's links (paginated)
/// - `DELETE /links/{id}`  - Delete one of the caller's links
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/{id}", delete(delete_link_handler))
}
