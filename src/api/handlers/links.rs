//! Handlers for link creation, listing and deletion.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, CreateLinkResponse, LinkListResponse, LinkResponse};
use crate::api::dto::pagination::PaginationParams;
use crate::api::middleware::auth::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Validates the request and creates the link, optionally owned.
async fn create(
    state: &AppState,
    payload: CreateLinkRequest,
    owner: Option<String>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    payload.validate()?;
    let lifetime = payload.lifetime();

    let created = state
        .link_service
        .create_link(payload.url, payload.custom_code, lifetime, owner)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse {
            code: created.link.code,
            short_url: created.short_url,
            expires_at: created.link.expires_at,
        }),
    ))
}

/// Creates an anonymous short link.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "custom_code": "Promo24", "duration": 24 }
/// ```
///
/// `custom_code` and `duration` (hours, 1-720) are optional.
///
/// # Errors
///
/// - 400 if validation fails
/// - 409 if the custom code is taken or a concurrent request claimed it
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    create(&state, payload, None).await
}

/// Creates a short link owned by the authenticated caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// Same body and errors as [`shorten_handler`]; the link can later be listed
/// and deleted through the API with the same token.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(Owner(owner)): Extension<Owner>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    create(&state, payload, Some(owner)).await
}

/// Lists the caller's links, oldest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&page_size=20`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(Owner(owner)): Extension<Owner>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (page, page_size) = params.resolve()?;

    let links = state
        .link_service
        .list_links_for_owner(&owner, page, page_size)
        .await?;

    let items = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.code);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        page,
        page_size,
        items,
    }))
}

/// Permanently deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// A cached copy may keep redirecting until its TTL lapses.
///
/// # Errors
///
/// Returns 404 if the link does not exist or belongs to another owner.
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(Owner(owner)): Extension<Owner>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(id, &owner).await?;
    Ok(StatusCode::NO_CONTENT)
}
