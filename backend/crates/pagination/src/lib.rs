//! Offset pagination primitives shared by Speadwear list endpoints.
//!
//! A [`PageRequest`] is the validated `page`/`per_page` pair taken from a
//! query string. Adapters turn it into `LIMIT`/`OFFSET` through
//! [`PageRequest::limit`] and [`PageRequest::offset`]. A [`Page`] is the
//! envelope returned to callers: the slice of items plus the total number of
//! matching rows, echoing the request that produced it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size accepted from callers.
pub const MAX_PER_PAGE: u32 = 100;

/// Validation failures for pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be at least 1, got {page}")]
    PageOutOfRange {
        /// Rejected page number.
        page: u32,
    },
    /// Page size outside `1..=MAX_PER_PAGE`.
    #[error("per_page must be between 1 and {max}, got {per_page}")]
    PerPageOutOfRange {
        /// Rejected page size.
        per_page: u32,
        /// Largest accepted page size.
        max: u32,
    },
}

/// Validated one-based page number and page size.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 10).expect("valid page");
/// assert_eq!(request.limit(), 10);
/// assert_eq!(request.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate an explicit page number and size.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` is zero or `per_page` falls
    /// outside `1..=MAX_PER_PAGE`.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange { page });
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageOutOfRange {
                per_page,
                max: MAX_PER_PAGE,
            });
        }
        Ok(Self { page, per_page })
    }

    /// Build a request from optional query parameters, applying defaults.
    ///
    /// # Errors
    /// Same as [`PageRequest::new`] once defaults are applied.
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PER_PAGE))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Row limit for SQL `LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// Row offset for SQL `OFFSET`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    /// Slice an in-memory, already ordered collection the same way the SQL
    /// adapters do.
    #[must_use]
    pub fn slice<T: Clone>(&self, rows: &[T]) -> Vec<T> {
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        rows.iter().skip(skip).take(take).cloned().collect()
    }
}

/// One page of results plus the total number of matching rows.
///
/// # Examples
/// ```
/// use pagination::{Page, PageRequest};
///
/// let page = Page::new(vec![1, 2], 7, PageRequest::default());
/// let doubled = page.map(|value| value * 2);
/// assert_eq!(doubled.items(), &[2, 4]);
/// assert_eq!(doubled.total_count(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    total_count: i64,
    page: u32,
    per_page: u32,
}

impl<T> Page<T> {
    /// Wrap a slice of results.
    #[must_use]
    pub const fn new(items: Vec<T>, total_count: i64, request: PageRequest) -> Self {
        Self {
            items,
            total_count,
            page: request.page,
            per_page: request.per_page,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of rows matching the query, across all pages.
    #[must_use]
    pub const fn total_count(&self) -> i64 {
        self.total_count
    }

    /// One-based page number this page answers.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size this page answers.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Transform every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for pagination arithmetic and validation.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 20, 20, 0)]
    #[case(2, 20, 20, 20)]
    #[case(5, 7, 7, 28)]
    fn limit_and_offset_follow_page_numbers(
        #[case] page: u32,
        #[case] per_page: u32,
        #[case] limit: i64,
        #[case] offset: i64,
    ) {
        let request = PageRequest::new(page, per_page).expect("valid request");
        assert_eq!(request.limit(), limit);
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    #[case(0, 20, PageRequestError::PageOutOfRange { page: 0 })]
    #[case(1, 0, PageRequestError::PerPageOutOfRange { per_page: 0, max: MAX_PER_PAGE })]
    #[case(1, 101, PageRequestError::PerPageOutOfRange { per_page: 101, max: MAX_PER_PAGE })]
    fn invalid_requests_are_rejected(
        #[case] page: u32,
        #[case] per_page: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, per_page), Err(expected));
    }

    #[rstest]
    fn from_query_applies_defaults() {
        let request = PageRequest::from_query(None, None).expect("defaults are valid");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.per_page(), DEFAULT_PER_PAGE);
    }

    #[rstest]
    fn slice_matches_sql_window() {
        let rows: Vec<u32> = (1..=10).collect();
        let request = PageRequest::new(2, 4).expect("valid request");
        assert_eq!(request.slice(&rows), vec![5, 6, 7, 8]);

        let beyond = PageRequest::new(4, 4).expect("valid request");
        assert!(beyond.slice(&rows).is_empty());
    }

    #[rstest]
    fn page_serialises_metadata() {
        let page = Page::new(vec!["a"], 3, PageRequest::new(2, 1).expect("valid"));
        let json = serde_json::to_value(&page).expect("serialise page");
        assert_eq!(json["total_count"], 3);
        assert_eq!(json["page"], 2);
        assert_eq!(json["per_page"], 1);
        assert_eq!(json["items"][0], "a");
    }
}
