//! 1-based page requests and the paginated result wrapper.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A validated, 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// 1-based page number
    pub page_number: u64,
    /// Rows per page
    pub page_size: u64,
}

impl PageRequest {
    /// Builds a page request, rejecting page numbers or sizes below 1.
    pub fn new(page_number: u64, page_size: u64) -> Result<Self> {
        let page = Self {
            page_number,
            page_size,
        };
        page.validate()?;
        Ok(page)
    }

    /// Checks that both fields are at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.page_number == 0 {
            return Err(Error::invalid_argument("Page numbers start at 1"));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_argument("Page size must be at least 1"));
        }
        Ok(())
    }

    /// Zero-based page index as expected by `sea_orm::Paginator::fetch_page`.
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.page_number.saturating_sub(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results with the unpaged total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    /// Rows on this page
    pub data: Vec<T>,
    /// Matching rows across all pages
    pub total_records: u64,
    /// 1-based page number
    pub page_number: u64,
    /// Rows per page
    pub page_size: u64,
    /// `ceil(total_records / page_size)`
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    /// Wraps one page of rows with its paging metadata.
    #[must_use]
    pub fn new(data: Vec<T>, total_records: u64, page: PageRequest) -> Self {
        Self {
            data,
            total_records,
            page_number: page.page_number,
            page_size: page.page_size,
            total_pages: total_records.div_ceil(page.page_size.max(1)),
        }
    }

    /// Converts every element while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            data: self.data.into_iter().map(f).collect(),
            total_records: self.total_records,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}
