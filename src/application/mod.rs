//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits and provide the API that
//! HTTP handlers and background tasks call into.
//!
//! - [`services::link_service::LinkService`] - Link creation, resolution and lifecycle
//! - [`services::auth_service::AuthService`] - API token authentication
//! - [`sweeper::run_sweeper`] - Periodic removal of expired links

pub mod services;
pub mod sweeper;
