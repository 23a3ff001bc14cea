//! Cursor codecs
//!
//! A [`CursorCodec`] converts between the client-facing [`CursorContext`] and
//! the query layer's [`PagingRequest`]. Codecs compose: the
//! [`IntegrityCheckingCodec`] wraps any other codec and binds its cursors to
//! the [`RequestIdentity`] they were issued for.
//!
//! # Example
//!
//! ```rust
//! use cursor_pagination::codec::{CursorCodec, IntegrityCheckingCodec, SimplePageCodec};
//! use cursor_pagination::context::PagingRequest;
//! use cursor_pagination::request::RequestIdentity;
//! use cursor_pagination::sort::SortSpecification;
//!
//! let codec = IntegrityCheckingCodec::new(SimplePageCodec);
//! let identity = RequestIdentity::new("/items").with_param("q", "rust");
//!
//! let page = PagingRequest::new(3, 20, SortSpecification::unsorted());
//! let context = codec.encode(&page, &identity);
//! assert_eq!(codec.decode(&context, &identity).unwrap(), page);
//!
//! let elsewhere = RequestIdentity::new("/items").with_param("q", "go");
//! assert!(codec.decode(&context, &elsewhere).unwrap_err().is_integrity_failure());
//! ```
//!
//! # Custom codecs
//!
//! Host applications can supply their own cursor representation (for example
//! an encrypted token) and keep the integrity layer on top:
//!
//! ```rust
//! use cursor_pagination::codec::{CursorCodec, IntegrityCheckingCodec};
//! use cursor_pagination::context::{CursorContext, PagingRequest};
//! use cursor_pagination::error::CursorDecodeError;
//! use cursor_pagination::request::RequestIdentity;
//!
//! struct HexPageCodec;
//!
//! impl CursorCodec for HexPageCodec {
//!     fn decode(
//!         &self,
//!         context: &CursorContext,
//!         _identity: &RequestIdentity,
//!     ) -> Result<PagingRequest, CursorDecodeError> {
//!         let index = match context.cursor() {
//!             None => 0,
//!             Some(token) => u64::from_str_radix(token, 16)
//!                 .map_err(|e| CursorDecodeError::malformed_with_source("bad hex cursor", e))?,
//!         };
//!         Ok(PagingRequest::new(index, context.page_size(), context.sort().clone()))
//!     }
//!
//!     fn encode(&self, request: &PagingRequest, _identity: &RequestIdentity) -> CursorContext {
//!         CursorContext::new(
//!             Some(format!("{:x}", request.page_index())),
//!             request.page_size(),
//!             request.sort().clone(),
//!         )
//!     }
//! }
//!
//! let codec = IntegrityCheckingCodec::new(HexPageCodec);
//! # let _ = codec;
//! ```

mod integrity;
mod simple;

use std::sync::Arc;

pub use integrity::{IntegrityCheckingCodec, CHECKSUM_LEN, CHECKSUM_SEPARATOR};
pub use simple::SimplePageCodec;

use crate::context::{CursorContext, PagingRequest};
use crate::error::CursorDecodeError;
use crate::request::RequestIdentity;

/// Converts between opaque cursors and page requests
///
/// Implementations must be pure functions of their inputs so that a single
/// instance can serve every request concurrently.
pub trait CursorCodec: Send + Sync {
    /// Interpret the cursor in `context` for the request identified by `identity`
    ///
    /// # Errors
    ///
    /// Returns [`CursorDecodeError`] when the cursor is malformed for this codec
    /// or, for wrapping codecs, when the integrity check fails.
    fn decode(
        &self,
        context: &CursorContext,
        identity: &RequestIdentity,
    ) -> Result<PagingRequest, CursorDecodeError>;

    /// Produce the cursor context that addresses `request`
    fn encode(&self, request: &PagingRequest, identity: &RequestIdentity) -> CursorContext;
}

impl<C: CursorCodec + ?Sized> CursorCodec for &C {
    fn decode(
        &self,
        context: &CursorContext,
        identity: &RequestIdentity,
    ) -> Result<PagingRequest, CursorDecodeError> {
        (**self).decode(context, identity)
    }

    fn encode(&self, request: &PagingRequest, identity: &RequestIdentity) -> CursorContext {
        (**self).encode(request, identity)
    }
}

impl<C: CursorCodec + ?Sized> CursorCodec for Box<C> {
    fn decode(
        &self,
        context: &CursorContext,
        identity: &RequestIdentity,
    ) -> Result<PagingRequest, CursorDecodeError> {
        (**self).decode(context, identity)
    }

    fn encode(&self, request: &PagingRequest, identity: &RequestIdentity) -> CursorContext {
        (**self).encode(request, identity)
    }
}

impl<C: CursorCodec + ?Sized> CursorCodec for Arc<C> {
    fn decode(
        &self,
        context: &CursorContext,
        identity: &RequestIdentity,
    ) -> Result<PagingRequest, CursorDecodeError> {
        (**self).decode(context, identity)
    }

    fn encode(&self, request: &PagingRequest, identity: &RequestIdentity) -> CursorContext {
        (**self).encode(request, identity)
    }
}
