//! axum extractor for paged collection endpoints
//!
//! [`Paged`] resolves the paging parameters of the request with the
//! [`PageRequestBinder`] found in router state, and rejects with a
//! `400 Bad Request` carrying [`PaginationError`] when they are invalid.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{routing::get, Json, Router};
//! use cursor_pagination::binder::PageRequestBinder;
//! use cursor_pagination::extract::Paged;
//! use cursor_pagination::links::PageLinks;
//!
//! async fn list_items(paged: Paged) -> Json<PageLinks> {
//!     let request = paged.request();
//!     // fetch request.page_size() + 1 rows starting at request.offset()
//!     let has_next = false;
//!     Json(paged.links(has_next))
//! }
//!
//! let app: Router = Router::new()
//!     .route("/items", get(list_items))
//!     .with_state(PageRequestBinder::default());
//! ```

use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::request::Parts,
};

use crate::binder::PageRequestBinder;
use crate::context::PagingRequest;
use crate::error::PaginationError;
use crate::links::PageLinks;
use crate::request::RequestTarget;

/// A resolved page request together with the request it came from
///
/// The router state must provide a [`PageRequestBinder`] through
/// [`FromRef`]; a state that is itself a binder qualifies.
#[derive(Debug, Clone)]
pub struct Paged {
    request: PagingRequest,
    target: RequestTarget,
    binder: PageRequestBinder,
}

impl Paged {
    /// The page to fetch
    #[must_use]
    pub fn request(&self) -> &PagingRequest {
        &self.request
    }

    /// Path and query of the inbound request
    #[must_use]
    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    /// The binder that resolved this request
    #[must_use]
    pub fn binder(&self) -> &PageRequestBinder {
        &self.binder
    }

    /// Navigation links for the page, pointing back at the inbound request
    #[must_use]
    pub fn links(&self, has_next: bool) -> PageLinks {
        PageLinks::new(&self.binder, &self.request, &self.target, has_next)
    }

    /// Take the page request
    #[must_use]
    pub fn into_request(self) -> PagingRequest {
        self.request
    }
}

impl<S> FromRequestParts<S> for Paged
where
    PageRequestBinder: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = PaginationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let binder = PageRequestBinder::from_ref(state);

        // Nested routers strip their prefix from `parts.uri`
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map_or(&parts.uri, |original| &original.0);
        let target = RequestTarget::from_uri(uri);

        let request = binder.resolve(&target)?;

        Ok(Self {
            request,
            target,
            binder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SimplePageCodec;
    use axum::{
        body::to_bytes,
        http::{Request, StatusCode},
        response::IntoResponse,
    };

    fn parts(uri: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[derive(Clone)]
    struct AppState {
        binder: PageRequestBinder,
    }

    impl FromRef<AppState> for PageRequestBinder {
        fn from_ref(state: &AppState) -> Self {
            state.binder.clone()
        }
    }

    #[tokio::test]
    async fn test_extracts_first_page_without_parameters() {
        let binder = PageRequestBinder::default();
        let paged = Paged::from_request_parts(&mut parts("/items"), &binder)
            .await
            .unwrap();

        assert_eq!(paged.request().page_index(), 0);
        assert_eq!(paged.request().page_size(), 20);
        assert!(paged.request().sort().is_unsorted());
    }

    #[tokio::test]
    async fn test_extracts_from_app_state() {
        let state = AppState {
            binder: PageRequestBinder::new(SimplePageCodec),
        };
        let paged = Paged::from_request_parts(&mut parts("/items?page=4&size=5&sort=id,desc"), &state)
            .await
            .unwrap();

        assert_eq!(paged.request().page_index(), 4);
        assert_eq!(paged.request().page_size(), 5);
        assert_eq!(paged.target().path(), "/items");
    }

    #[tokio::test]
    async fn test_links_round_trip_through_extractor() {
        let binder = PageRequestBinder::default();
        let first = Paged::from_request_parts(&mut parts("/items?q=rust"), &binder)
            .await
            .unwrap();

        let links = first.links(true);
        let next = links.next.expect("next link");
        let second = Paged::from_request_parts(&mut parts(&next), &binder)
            .await
            .unwrap();

        assert_eq!(second.request().page_index(), 1);
        assert_eq!(second.target().first("q"), Some("rust"));
    }

    #[tokio::test]
    async fn test_original_uri_preferred() {
        let binder = PageRequestBinder::default();
        let first = Paged::from_request_parts(&mut parts("/api/items"), &binder)
            .await
            .unwrap();
        let next = first.links(true).next.expect("next link");

        let mut nested = parts("/items");
        let original: axum::http::Uri = next.parse().unwrap();
        nested.extensions.insert(OriginalUri(original));

        let paged = Paged::from_request_parts(&mut nested, &binder).await.unwrap();
        assert_eq!(paged.target().path(), "/api/items");
        assert_eq!(paged.request().page_index(), 1);
    }

    #[tokio::test]
    async fn test_rejects_tampered_cursor_with_bad_request() {
        let binder = PageRequestBinder::default();
        let first = Paged::from_request_parts(&mut parts("/items?q=rust"), &binder)
            .await
            .unwrap();
        let next = first.links(true).next.expect("next link");
        let replayed = next.replace("q=rust", "q=go");

        let err = Paged::from_request_parts(&mut parts(&replayed), &binder)
            .await
            .unwrap_err();
        assert!(err.is_integrity_failure());

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "INVALID_PAGINATION");
        assert_eq!(json["parameter"], "page");
        assert_eq!(json["status"], 400);
    }

    #[tokio::test]
    async fn test_rejects_invalid_size() {
        let binder = PageRequestBinder::default();
        let err = Paged::from_request_parts(&mut parts("/items?size=0"), &binder)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PAGE_SIZE");
        assert!(err
            .to_string()
            .starts_with("Invalid parameter 'size': must be positive"));
    }
}
