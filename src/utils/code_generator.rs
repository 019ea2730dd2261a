//! Short code generation and validation utilities.
//!
//! Provides random code generation over a 62-symbol alphabet and validation
//! for custom user-provided codes.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Shortest allowed code, generated or custom.
pub const MIN_CODE_LENGTH: usize = 4;

/// Longest allowed code, generated or custom.
pub const MAX_CODE_LENGTH: usize = 10;

/// Reserved codes that cannot be used as short links.
///
/// These collide with fixed routes of the HTTP layer.
const RESERVED_CODES: &[&str] = &["health", "shorten"];

/// Source of candidate short codes.
///
/// Implementations need not produce unique codes; callers check
/// availability against the store.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Generates codes of a fixed length, each character drawn uniformly and
/// independently from `a-z`, `A-Z` and `0-9`.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator for codes of `length` characters.
    ///
    /// `length` is validated at configuration load time (4..=10).
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 4-10 characters
/// - Allowed characters: ASCII letters and digits (case-sensitive)
/// - Cannot be a reserved route word
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any validation rule is violated.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_custom_code("Promo24").is_ok());
/// assert!(validate_custom_code("abc").is_err());        // Too short
/// assert!(validate_custom_code("my-link").is_err());    // Hyphen
/// assert!(validate_custom_code("health").is_err());     // Reserved
/// ```
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Custom code must be 4-10 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters and digits",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
