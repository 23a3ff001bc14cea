//! # cursor-pagination
//!
//! Opaque, tamper-evident pagination cursors for collection endpoints.
//!
//! Clients page through a collection by following links that carry three
//! query parameters: `page` (an opaque cursor), `size` and `sort`. Each cursor
//! is bound to the request it was issued for, so replaying it against a
//! different path, filter, page size or sort is rejected instead of silently
//! returning the wrong page.
//!
//! ## Features
//!
//! - **Codec stack**: [`SimplePageCodec`](codec::SimplePageCodec) page numbers
//!   wrapped by [`IntegrityCheckingCodec`](codec::IntegrityCheckingCodec)
//!   BLAKE3 checksums, optionally keyed; host codecs plug in through
//!   [`CursorCodec`](codec::CursorCodec)
//! - **Binding**: [`PageRequestBinder`](binder::PageRequestBinder) resolves
//!   inbound query parameters and writes outgoing links
//! - **axum**: the [`Paged`](extract::Paged) extractor and a `400 Bad Request`
//!   mapping for [`PaginationError`](error::PaginationError) (feature `http`)
//! - **Configuration**: figment with TOML files, XDG paths and `CURSOR_`
//!   environment variables
//!
//! ## Example
//!
//! ```rust,no_run
//! use cursor_pagination::prelude::*;
//! use axum::{routing::get, Json};
//!
//! async fn list_items(paged: Paged) -> Json<PageLinks> {
//!     Json(paged.links(false))
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let binder = PageRequestBinder::from_config(&config.paging)?;
//!     let app = axum::Router::new()
//!         .route("/items", get(list_items))
//!         .with_state(binder);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod binder;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod links;
pub mod observability;
pub mod request;
pub mod sort;

#[cfg(feature = "http")]
pub mod extract;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::binder::PageRequestBinder;
    pub use crate::codec::{CursorCodec, IntegrityCheckingCodec, SimplePageCodec};
    pub use crate::config::{Config, PagingConfig, ServiceConfig};
    pub use crate::context::{CursorContext, PagingRequest};
    pub use crate::error::{
        CursorDecodeError, Error, ErrorResponse, IntegrityCheckFailed, PaginationError, Result,
    };
    pub use crate::links::PageLinks;
    pub use crate::observability::init_tracing;
    pub use crate::request::{RequestIdentity, RequestTarget};
    pub use crate::sort::{Direction, Order, SortSpecification};

    #[cfg(feature = "http")]
    pub use crate::extract::Paged;
}
