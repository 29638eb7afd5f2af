//! Request and response shapes of the HTTP API.
//!
//! Entities (`Agenda`, `Contact`) and the contact body (`ContactInfo`) are
//! serialized as-is; this module only adds envelopes and query parameters.

use crate::error::ApiError;
use opencontact_core::{Page, PageRequest, Sort, SortField};
use serde::{Deserialize, Serialize};

/// Body of agenda create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct AgendaRequest {
    pub name: String,
}

/// Paging parameters shared by list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl PageQuery {
    /// Builds a core page request. Unknown sort fields are rejected.
    pub fn to_request<S: SortField + Default>(&self) -> Result<PageRequest<S>, ApiError> {
        page_request(self.page, self.size, self.sort.as_deref())
    }
}

/// Query of the contact listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListQuery {
    pub name_contains: Option<String>,
    pub phone_contains: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl ContactListQuery {
    pub fn to_request<S: SortField + Default>(&self) -> Result<PageRequest<S>, ApiError> {
        page_request(self.page, self.size, self.sort.as_deref())
    }
}

/// Query of the prefix bulk delete.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixDeleteQuery {
    pub name_prefix: Option<String>,
}

impl PrefixDeleteQuery {
    /// Returns the prefix, refusing a missing or blank one so a bare DELETE
    /// cannot empty an agenda.
    pub fn prefix(&self) -> Result<&str, ApiError> {
        match self.name_prefix.as_deref() {
            Some(prefix) if !prefix.trim().is_empty() => Ok(prefix),
            _ => Err(ApiError::bad_request(
                "VALIDATION_ERROR",
                "namePrefix cannot be blank",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub current_page: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            content: page.content,
            current_page: page.number,
            page_size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletedResponse {
    pub deleted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

fn page_request<S: SortField + Default>(
    page: Option<u32>,
    size: Option<u32>,
    sort: Option<&str>,
) -> Result<PageRequest<S>, ApiError> {
    let sort = match sort.map(str::trim).filter(|value| !value.is_empty()) {
        None => Sort::default(),
        Some(value) => Sort::parse(value).ok_or_else(|| {
            ApiError::bad_request("INVALID_SORT", format!("unsupported sort `{value}`"))
        })?,
    };
    Ok(PageRequest::new(page.unwrap_or(0), size, sort))
}
