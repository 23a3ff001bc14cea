//! Paging values exchanged between the binder, the codecs and the query layer
//!
//! [`CursorContext`] is the client-facing shape of a page request: an opaque
//! cursor plus the page size and sort that travel next to it. [`PagingRequest`]
//! is what the query layer consumes: a zero-based page index.
//!
//! Both are immutable values. Every transformation produces a new instance.

use serde::{Deserialize, Serialize};

use crate::sort::SortSpecification;

/// Opaque cursor together with the page size and sort it was supplied with
///
/// # Example
///
/// ```rust
/// use cursor_pagination::context::CursorContext;
/// use cursor_pagination::sort::SortSpecification;
///
/// let first = CursorContext::new(None, 20, SortSpecification::unsorted());
/// assert!(first.cursor().is_none());
///
/// let next = first.with_cursor(Some("1".to_string()));
/// assert_eq!(next.cursor(), Some("1"));
/// assert_eq!(next.page_size(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorContext {
    cursor: Option<String>,
    page_size: u32,
    sort: SortSpecification,
}

impl CursorContext {
    /// Create a cursor context; `None` means the first page
    #[must_use]
    pub fn new(cursor: Option<String>, page_size: u32, sort: SortSpecification) -> Self {
        Self {
            cursor,
            page_size,
            sort,
        }
    }

    /// The opaque cursor token, if any
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Requested page size
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Requested sort
    #[must_use]
    pub fn sort(&self) -> &SortSpecification {
        &self.sort
    }

    /// Same page size and sort with a different cursor
    #[must_use]
    pub fn with_cursor(&self, cursor: Option<String>) -> Self {
        Self {
            cursor,
            page_size: self.page_size,
            sort: self.sort.clone(),
        }
    }

    /// Split into cursor, page size and sort
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, u32, SortSpecification) {
        (self.cursor, self.page_size, self.sort)
    }
}

/// A page request as understood by the query layer
///
/// # Example
///
/// ```rust
/// use cursor_pagination::context::PagingRequest;
/// use cursor_pagination::sort::SortSpecification;
///
/// let page = PagingRequest::new(2, 25, SortSpecification::unsorted());
/// assert_eq!(page.offset(), 50);
/// assert_eq!(page.next().page_index(), 3);
/// assert_eq!(page.previous().map(|p| p.page_index()), Some(1));
/// assert!(page.first().previous().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PagingRequest {
    page_index: u64,
    page_size: u32,
    sort: SortSpecification,
}

impl PagingRequest {
    /// Create a page request for a zero-based page index
    #[must_use]
    pub fn new(page_index: u64, page_size: u32, sort: SortSpecification) -> Self {
        Self {
            page_index,
            page_size,
            sort,
        }
    }

    /// The first page with the given size and sort
    #[must_use]
    pub fn first_page(page_size: u32, sort: SortSpecification) -> Self {
        Self::new(0, page_size, sort)
    }

    /// Zero-based page index
    #[must_use]
    pub const fn page_index(&self) -> u64 {
        self.page_index
    }

    /// Number of items per page
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Sort to apply
    #[must_use]
    pub fn sort(&self) -> &SortSpecification {
        &self.sort
    }

    /// Number of items to skip, saturating at `u64::MAX`
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page_index.saturating_mul(u64::from(self.page_size))
    }

    /// The following page
    #[must_use]
    pub fn next(&self) -> Self {
        self.at(self.page_index.saturating_add(1))
    }

    /// The preceding page, or `None` on the first page
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        self.page_index.checked_sub(1).map(|index| self.at(index))
    }

    /// The first page with this size and sort
    #[must_use]
    pub fn first(&self) -> Self {
        self.at(0)
    }

    /// Whether this is the first page
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.page_index == 0
    }

    fn at(&self, page_index: u64) -> Self {
        Self {
            page_index,
            page_size: self.page_size,
            sort: self.sort.clone(),
        }
    }
}
