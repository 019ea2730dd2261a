//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService};
use crate::domain::repositories::{LinkRepository, TokenRepository};
use crate::infrastructure::cache::CacheService;

/// Link service over trait objects, as wired by the server.
pub type DynLinkService = LinkService<dyn LinkRepository, dyn CacheService>;

/// Auth service over a trait-object token repository.
pub type DynAuthService = AuthService<dyn TokenRepository>;

/// State shared across all request handlers.
///
/// Cheap to clone; every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub auth_service: Arc<DynAuthService>,
}

impl AppState {
    pub fn new(link_service: Arc<DynLinkService>, auth_service: Arc<DynAuthService>) -> Self {
        Self {
            link_service,
            auth_service,
        }
    }
}
