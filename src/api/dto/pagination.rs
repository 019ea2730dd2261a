//! Pagination query parameters.

use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters (`?page=&page_size=`).
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Applies defaults and bounds, returning `(page, page_size)`.
    ///
    /// `page` defaults to 1 and must be positive; `page_size` defaults to
    /// [`DEFAULT_PAGE_SIZE`] and must be within `1..=MAX_PAGE_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when either value is out of range.
    pub fn resolve(&self) -> Result<(u32, u32), AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "page_size": page_size }),
            ));
        }

        Ok((page, page_size))
    }
}
