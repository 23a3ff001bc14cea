//! Page-number cursors

use crate::context::{CursorContext, PagingRequest};
use crate::error::CursorDecodeError;
use crate::request::RequestIdentity;

use super::CursorCodec;

/// Treats the cursor as a decimal, zero-based page number
///
/// An absent cursor decodes to page 0, but encoding always emits a token,
/// including `"0"` for the first page. Page size and sort pass through
/// untouched in both directions.
///
/// # Example
///
/// ```rust
/// use cursor_pagination::codec::{CursorCodec, SimplePageCodec};
/// use cursor_pagination::context::{CursorContext, PagingRequest};
/// use cursor_pagination::request::RequestIdentity;
/// use cursor_pagination::sort::SortSpecification;
///
/// let identity = RequestIdentity::new("/items");
/// let first = CursorContext::new(None, 20, SortSpecification::unsorted());
/// assert_eq!(SimplePageCodec.decode(&first, &identity).unwrap().page_index(), 0);
///
/// let page = PagingRequest::first_page(20, SortSpecification::unsorted());
/// assert_eq!(SimplePageCodec.encode(&page, &identity).cursor(), Some("0"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplePageCodec;

impl CursorCodec for SimplePageCodec {
    fn decode(
        &self,
        context: &CursorContext,
        _identity: &RequestIdentity,
    ) -> Result<PagingRequest, CursorDecodeError> {
        let page_index = match context.cursor() {
            None => 0,
            Some(token) => {
                token
                    .parse::<u64>()
                    .map_err(|source| CursorDecodeError::InvalidPageNumber {
                        token: token.to_string(),
                        source,
                    })?
            }
        };

        Ok(PagingRequest::new(
            page_index,
            context.page_size(),
            context.sort().clone(),
        ))
    }

    fn encode(&self, request: &PagingRequest, _identity: &RequestIdentity) -> CursorContext {
        CursorContext::new(
            Some(request.page_index().to_string()),
            request.page_size(),
            request.sort().clone(),
        )
    }
}
