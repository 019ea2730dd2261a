//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx
//! prepared statements.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, ownership-scoped deletion and expiry sweeping
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_link_repository;
pub mod pg_token_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
