//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Resolution goes through the cache first and falls back to the database on
/// a miss (see [`crate::application::services::LinkService::resolve_link`]).
/// Links past their expiry keep redirecting until the sweeper removes them.
///
/// # Errors
///
/// - 404 Not Found if no link holds the code
/// - 500 if the cache or database is unavailable
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let original_url = state.link_service.resolve_link(&code).await?;
    Ok(Redirect::temporary(&original_url))
}
