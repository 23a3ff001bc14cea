//! Binding between query parameters and page requests
//!
//! [`PageRequestBinder`] reads the `page`, `size` and `sort` query parameters
//! of an inbound request, applies defaults and bounds, and decodes the cursor
//! through the configured codec stack. In the other direction it encodes an
//! outgoing [`PagingRequest`] into the query parameters of a link.
//!
//! # Example
//!
//! ```rust
//! use cursor_pagination::binder::PageRequestBinder;
//! use cursor_pagination::request::RequestTarget;
//!
//! let binder = PageRequestBinder::default();
//!
//! let first = binder.resolve(&RequestTarget::parse("/items?q=rust")).unwrap();
//! assert_eq!(first.page_index(), 0);
//! assert_eq!(first.page_size(), 20);
//!
//! let next = binder.enhance(&first.next(), &RequestTarget::parse("/items?q=rust"));
//! let resolved = binder.resolve(&next).unwrap();
//! assert_eq!(resolved.page_index(), 1);
//! ```

use std::fmt;
use std::num::IntErrorKind;
use std::sync::Arc;

use url::Url;

use crate::codec::{CursorCodec, IntegrityCheckingCodec, SimplePageCodec};
use crate::config::PagingConfig;
use crate::context::{CursorContext, PagingRequest};
use crate::error::{PageSizeError, PaginationError, Result};
use crate::request::{RequestIdentity, RequestTarget};
use crate::sort::SortSpecification;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default upper bound on items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default name of the cursor query parameter
pub const PAGE_PARAMETER: &str = "page";

/// Default name of the page size query parameter
pub const SIZE_PARAMETER: &str = "size";

/// Default name of the sort query parameter
pub const SORT_PARAMETER: &str = "sort";

/// Resolves paged requests from query parameters and writes them back into links
///
/// Cheap to clone; clones share the codec. One binder is meant to serve every
/// request of a process, with per-endpoint variants made by
/// [`with_default_page_size`](Self::with_default_page_size) and
/// [`with_max_page_size`](Self::with_max_page_size).
#[derive(Clone)]
pub struct PageRequestBinder {
    codec: Arc<dyn CursorCodec>,
    default_page_size: u32,
    max_page_size: u32,
    page_parameter: String,
    size_parameter: String,
    sort_parameter: String,
}

impl PageRequestBinder {
    /// Create a binder over `codec` with the default sizes and parameter names
    pub fn new(codec: impl CursorCodec + 'static) -> Self {
        Self::from_shared(Arc::new(codec))
    }

    /// Create a binder over an already shared codec
    pub fn from_shared(codec: Arc<dyn CursorCodec>) -> Self {
        Self {
            codec,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            page_parameter: PAGE_PARAMETER.to_string(),
            size_parameter: SIZE_PARAMETER.to_string(),
            sort_parameter: SORT_PARAMETER.to_string(),
        }
    }

    /// Build the standard codec stack from configuration
    ///
    /// The stack is an [`IntegrityCheckingCodec`] over a [`SimplePageCodec`],
    /// keyed when `integrity_secret` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::error::Error::InvalidConfig) when
    /// the configuration does not validate.
    pub fn from_config(config: &PagingConfig) -> Result<Self> {
        config.validate()?;

        let binder = match config.integrity_secret.as_deref() {
            Some(secret) => Self::new(IntegrityCheckingCodec::keyed(SimplePageCodec, secret)),
            None => Self::new(IntegrityCheckingCodec::new(SimplePageCodec)),
        };

        tracing::debug!(
            default_page_size = config.default_page_size,
            max_page_size = config.max_page_size,
            keyed = config.integrity_secret.is_some(),
            "Configured page request binder"
        );

        Ok(binder
            .with_max_page_size(config.max_page_size)
            .with_default_page_size(config.default_page_size)
            .with_parameter_names(
                &config.page_parameter,
                &config.size_parameter,
                &config.sort_parameter,
            ))
    }

    /// Page size used when the request has no `size` parameter
    ///
    /// Values above the maximum are lowered to it; zero is raised to one.
    #[must_use]
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size.clamp(1, self.max_page_size);
        self
    }

    /// Upper bound on the page size; larger requests are clamped silently
    ///
    /// Zero is raised to one. The default page size is lowered if it exceeds
    /// the new maximum.
    #[must_use]
    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.max(1);
        self.default_page_size = self.default_page_size.min(self.max_page_size);
        self
    }

    /// Rename the cursor, size and sort query parameters
    #[must_use]
    pub fn with_parameter_names(
        mut self,
        page: impl Into<String>,
        size: impl Into<String>,
        sort: impl Into<String>,
    ) -> Self {
        self.page_parameter = page.into();
        self.size_parameter = size.into();
        self.sort_parameter = sort.into();
        self
    }

    /// Page size used when the request has no `size` parameter
    #[must_use]
    pub const fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// Upper bound on the page size
    #[must_use]
    pub const fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// Name of the cursor query parameter
    #[must_use]
    pub fn page_parameter(&self) -> &str {
        &self.page_parameter
    }

    /// Name of the page size query parameter
    #[must_use]
    pub fn size_parameter(&self) -> &str {
        &self.size_parameter
    }

    /// Name of the sort query parameter
    #[must_use]
    pub fn sort_parameter(&self) -> &str {
        &self.sort_parameter
    }

    /// The codec stack
    #[must_use]
    pub fn codec(&self) -> &Arc<dyn CursorCodec> {
        &self.codec
    }

    /// The identity a cursor for `target` is bound to
    #[must_use]
    pub fn identity(&self, target: &RequestTarget) -> RequestIdentity {
        target.identity(&self.paging_parameters())
    }

    /// Read the raw cursor context from the query parameters of `target`
    ///
    /// Applies the default and maximum page size and parses the sort; the
    /// cursor is returned undecoded.
    ///
    /// # Errors
    ///
    /// [`PaginationError::InvalidPageSize`] for a non-numeric or non-positive
    /// `size`, [`PaginationError::InvalidSort`] for a malformed `sort`.
    pub fn cursor_context(
        &self,
        target: &RequestTarget,
    ) -> std::result::Result<CursorContext, PaginationError> {
        let page_size =
            self.page_size(target)
                .map_err(|source| PaginationError::InvalidPageSize {
                    parameter: self.size_parameter.clone(),
                    source,
                })?;

        let sort = SortSpecification::parse(target.values(&self.sort_parameter)).map_err(
            |source| PaginationError::InvalidSort {
                parameter: self.sort_parameter.clone(),
                source,
            },
        )?;

        let cursor = target.first(&self.page_parameter).map(str::to_string);

        Ok(CursorContext::new(cursor, page_size, sort))
    }

    /// Resolve the page request carried by `target`
    ///
    /// # Errors
    ///
    /// Everything [`cursor_context`](Self::cursor_context) reports, plus
    /// [`PaginationError::InvalidPagination`] when the cursor cannot be decoded
    /// or was issued for a different request. A bad cursor never falls back to
    /// the first page.
    pub fn resolve(
        &self,
        target: &RequestTarget,
    ) -> std::result::Result<PagingRequest, PaginationError> {
        let context = self.cursor_context(target)?;
        let identity = self.identity(target);

        let request = self
            .codec
            .decode(&context, &identity)
            .map_err(|source| PaginationError::InvalidPagination {
                parameter: self.page_parameter.clone(),
                source,
            })?;

        tracing::debug!(
            path = identity.path(),
            page_index = request.page_index(),
            page_size = request.page_size(),
            "Resolved paged request"
        );

        Ok(request)
    }

    /// Write `request` into the paging parameters of a link to `target`
    ///
    /// Existing `page`, `size` and `sort` parameters on `target` are replaced;
    /// every other parameter is kept in order. `sort` is omitted when the
    /// request is unsorted.
    #[must_use]
    pub fn enhance(&self, request: &PagingRequest, target: &RequestTarget) -> RequestTarget {
        let base = target.without_params(&self.paging_parameters());
        let context = self.codec.encode(request, &self.identity(&base));

        let mut link = base;
        if let Some(cursor) = context.cursor() {
            link = link.with_param(&self.page_parameter, cursor);
        }
        link = link.with_param(&self.size_parameter, context.page_size().to_string());
        for value in context.sort().to_query_values() {
            link = link.with_param(&self.sort_parameter, value);
        }
        link
    }

    /// [`enhance`](Self::enhance) an absolute URL in place, keeping its authority
    pub fn enhance_url(&self, request: &PagingRequest, url: &mut Url) {
        let link = self.enhance(request, &RequestTarget::from_url(url));
        url.set_query(None);
        if !link.query().is_empty() {
            url.query_pairs_mut().extend_pairs(link.query());
        }
    }

    fn paging_parameters(&self) -> [&str; 3] {
        [
            self.page_parameter.as_str(),
            self.size_parameter.as_str(),
            self.sort_parameter.as_str(),
        ]
    }

    fn page_size(&self, target: &RequestTarget) -> std::result::Result<u32, PageSizeError> {
        let Some(raw) = target.first(&self.size_parameter) else {
            return Ok(self.default_page_size);
        };

        match raw.parse::<i64>() {
            Ok(value) if value <= 0 => Err(PageSizeError::NotPositive { value }),
            Ok(value) => Ok(u32::try_from(value)
                .map_or(self.max_page_size, |size| size.min(self.max_page_size))),
            Err(source) => match source.kind() {
                IntErrorKind::PosOverflow => Ok(self.max_page_size),
                IntErrorKind::NegOverflow => Err(PageSizeError::NotPositive { value: i64::MIN }),
                _ => Err(PageSizeError::NotANumber {
                    value: raw.to_string(),
                    source,
                }),
            },
        }
    }
}

impl Default for PageRequestBinder {
    fn default() -> Self {
        Self::new(IntegrityCheckingCodec::new(SimplePageCodec))
    }
}

impl fmt::Debug for PageRequestBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequestBinder")
            .field("default_page_size", &self.default_page_size)
            .field("max_page_size", &self.max_page_size)
            .field("page_parameter", &self.page_parameter)
            .field("size_parameter", &self.size_parameter)
            .field("sort_parameter", &self.sort_parameter)
            .finish_non_exhaustive()
    }
}
