//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Identity of the authenticated caller: the name of the API token used.
///
/// Inserted into request extensions by [`layer`]; handlers take it with
/// `Extension<Owner>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

/// Authenticates requests using `Authorization: Bearer <token>`.
///
/// On success the token's owner is attached as an [`Owner`] extension and the
/// request continues. Missing, malformed, unknown and revoked tokens all yield
/// `401 Unauthorized` with `WWW-Authenticate: Bearer`.
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/links", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    let owner = st.auth_service.authenticate(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(Owner(owner));

    Ok(next.run(req).await)
}
