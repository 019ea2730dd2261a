//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs live in separate
//! structs (`NewLink`) so store-assigned fields never have to be faked.

pub mod link;

pub use link::{Link, NewLink};
