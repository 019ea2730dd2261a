//! Domain layer: link entities and the storage contracts they flow through.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! Repository traits are implemented by [`crate::infrastructure::persistence`];
//! business rules live in [`crate::application::services`].

pub mod entities;
pub mod repositories;
