//! Shared query parameter types for API handlers.

use std::str::FromStr;

use serde::Deserialize;
use setcrm_core::error::CoreError;
use setcrm_core::pagination::PageRequest;

/// Page-number pagination (`?page=&limit=`). Values are clamped by
/// [`PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Free-text search (`?search=`).
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// `?search=&status=` for filtered listings.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub search: Option<String>,
    pub status: Option<String>,
}

/// `?page=&limit=&search=&status=` for paginated, filtered listings.
#[derive(Debug, Default, Deserialize)]
pub struct PagedFilterParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl PagedFilterParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Trim a search term, treating blank as absent.
pub fn search_term(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an optional status filter; blank means "no filter".
pub fn parse_status<S>(status: Option<&str>) -> Result<Option<S>, CoreError>
where
    S: FromStr<Err = CoreError>,
{
    search_term(status).map(str::parse).transpose()
}
