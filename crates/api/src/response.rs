//! Shared response envelope types for API handlers.
//!
//! Plain responses use a `{ "data": ... }` envelope; paginated lists add
//! the page metadata next to `data` at the top level.

use serde::Serialize;
use setcrm_core::pagination::{total_pages, PageRequest};

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "total", "page", "limit", "total_pages" }`.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: PageRequest) -> Self {
        Self {
            data,
            total,
            page: page.page,
            limit: page.limit,
            total_pages: total_pages(total, page.limit),
        }
    }
}

/// `{ "success": true, "message": ... }`, used for acknowledgements.
#[derive(Debug, Serialize)]
pub struct SuccessMessage {
    pub success: bool,
    pub message: &'static str,
}

impl SuccessMessage {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
