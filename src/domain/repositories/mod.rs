//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access; concrete implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Durable link storage, ownership and expiry sweeping
//! - [`TokenRepository`] - API token authentication
//!
//! # Testing
//!
//! See `tests/repository_*.rs` for PostgreSQL-backed tests and
//! `tests/common` for the in-memory doubles used by service tests.

pub mod link_repository;
pub mod token_repository;

pub use link_repository::LinkRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
