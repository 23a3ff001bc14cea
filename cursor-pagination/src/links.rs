//! Navigation links for paged responses
//!
//! [`PageLinks`] carries the `self`, `first`, `prev` and `next` links of a
//! page, each produced by [`PageRequestBinder::enhance`] so every cursor in a
//! response is bound to the request it was generated from.
//!
//! # Example
//!
//! ```rust
//! use cursor_pagination::binder::PageRequestBinder;
//! use cursor_pagination::links::PageLinks;
//! use cursor_pagination::request::RequestTarget;
//!
//! let binder = PageRequestBinder::default();
//! let target = RequestTarget::parse("/items?q=rust");
//! let request = binder.resolve(&target).unwrap();
//!
//! let links = PageLinks::new(&binder, &request, &target, true);
//! assert!(links.prev.is_none());
//! assert!(links.next.is_some());
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::binder::PageRequestBinder;
use crate::context::PagingRequest;
use crate::request::RequestTarget;

/// Links to the current, first, previous and next page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLinks {
    /// The page being returned
    #[serde(rename = "self")]
    pub self_link: String,
    /// The first page with the same size and sort
    pub first: String,
    /// The preceding page; absent on the first page
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prev: Option<String>,
    /// The following page; absent when the caller reports no more results
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next: Option<String>,
}

impl PageLinks {
    /// Build links for `request` against `target`
    ///
    /// `has_next` comes from the query layer, typically by fetching one row
    /// more than the page size.
    #[must_use]
    pub fn new(
        binder: &PageRequestBinder,
        request: &PagingRequest,
        target: &RequestTarget,
        has_next: bool,
    ) -> Self {
        let link = |page: &PagingRequest| binder.enhance(page, target).to_string();

        Self {
            self_link: link(request),
            first: link(&request.first()),
            prev: request.previous().as_ref().map(link),
            next: has_next.then(|| link(&request.next())),
        }
    }

    /// Resolve every link against an absolute base URL
    ///
    /// # Errors
    ///
    /// Returns the URL parse error if a link cannot be joined onto `base`.
    pub fn absolute(&self, base: &Url) -> Result<Self, url::ParseError> {
        let join = |link: &str| base.join(link).map(String::from);

        Ok(Self {
            self_link: join(self.self_link.as_str())?,
            first: join(self.first.as_str())?,
            prev: self.prev.as_deref().map(join).transpose()?,
            next: self.next.as_deref().map(join).transpose()?,
        })
    }
}
