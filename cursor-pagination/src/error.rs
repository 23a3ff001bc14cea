//! Error types and HTTP response conversion
//!
//! Everything that can go wrong while binding a paged request is a client
//! input error. [`PaginationError`] is what handlers see; it names the query
//! parameter at fault and keeps the underlying cause reachable through
//! [`std::error::Error::source`].

use std::error::Error as StdError;
use std::fmt;
use std::num::ParseIntError;

#[cfg(feature = "http")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and setup errors
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or extracted
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but holds inconsistent values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A global tracing subscriber could not be installed
    #[error("Tracing initialization failed: {0}")]
    Tracing(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Why a cursor checksum was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityFailure {
    /// The checksum prefix is not a well-formed checksum
    MalformedChecksum,
    /// The checksum does not match the current request
    ChecksumMismatch,
}

impl fmt::Display for IntegrityFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedChecksum => write!(f, "malformed checksum"),
            Self::ChecksumMismatch => write!(f, "cursor does not belong to this request"),
        }
    }
}

/// A cursor was presented against a request it was not issued for
///
/// Raised when the path, the non-paging query parameters, the page size, the
/// sort or the wrapped cursor token differ from the ones the cursor was
/// minted with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cursor integrity check failed: {reason}")]
pub struct IntegrityCheckFailed {
    /// What was wrong with the checksum
    pub reason: IntegrityFailure,
}

impl IntegrityCheckFailed {
    pub(crate) const fn new(reason: IntegrityFailure) -> Self {
        Self { reason }
    }
}

/// A cursor token could not be interpreted by a codec
#[derive(Debug, Error)]
pub enum CursorDecodeError {
    /// Checksum mismatch against the current request identity
    #[error(transparent)]
    IntegrityCheckFailed(#[from] IntegrityCheckFailed),

    /// The token is not a non-negative base-10 page number
    #[error("cursor '{token}' is not a valid page number: {source}")]
    InvalidPageNumber {
        /// The offending token
        token: String,
        /// Numeric parse failure
        #[source]
        source: ParseIntError,
    },

    /// Codec-specific failure, for host-supplied codecs
    #[error("{message}")]
    Malformed {
        /// Human-readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl CursorDecodeError {
    /// Create a codec-specific failure without an underlying cause
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a codec-specific failure wrapping an underlying cause
    pub fn malformed_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Malformed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this failure came from the integrity layer
    #[must_use]
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::IntegrityCheckFailed(_))
    }
}

/// The `size` parameter does not hold a usable page size
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageSizeError {
    /// Zero or negative
    #[error("must be positive, got {value}")]
    NotPositive {
        /// Parsed value, saturated to the `i64` range
        value: i64,
    },

    /// Not a base-10 integer
    #[error("'{value}' is not a number: {source}")]
    NotANumber {
        /// Raw parameter value
        value: String,
        /// Numeric parse failure
        #[source]
        source: ParseIntError,
    },
}

/// A `sort` parameter value could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortParseError {
    /// The value names a direction or nothing, but no property
    #[error("'{value}' does not name a property to sort by")]
    MissingProperty {
        /// Raw parameter value
        value: String,
    },

    /// A direction token other than `asc`/`desc`
    #[error("'{value}' is not a sort direction (expected asc or desc)")]
    UnknownDirection {
        /// Raw direction token
        value: String,
    },
}

/// Failure binding the paging parameters of a request
///
/// Every variant is a client error; none is retriable.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// The `size` parameter is not a positive integer
    #[error("Invalid parameter '{parameter}': {source}")]
    InvalidPageSize {
        /// Name of the offending query parameter
        parameter: String,
        /// Underlying cause
        #[source]
        source: PageSizeError,
    },

    /// The `page` cursor could not be decoded or failed its integrity check
    #[error("Invalid parameter '{parameter}': {source}")]
    InvalidPagination {
        /// Name of the offending query parameter
        parameter: String,
        /// Underlying cause
        #[source]
        source: CursorDecodeError,
    },

    /// A `sort` parameter is malformed
    #[error("Invalid parameter '{parameter}': {source}")]
    InvalidSort {
        /// Name of the offending query parameter
        parameter: String,
        /// Underlying cause
        #[source]
        source: SortParseError,
    },
}

impl PaginationError {
    /// Name of the query parameter at fault
    #[must_use]
    pub fn parameter(&self) -> &str {
        match self {
            Self::InvalidPageSize { parameter, .. }
            | Self::InvalidPagination { parameter, .. }
            | Self::InvalidSort { parameter, .. } => parameter,
        }
    }

    /// Machine-readable error code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidPageSize { .. } => "INVALID_PAGE_SIZE",
            Self::InvalidPagination { .. } => "INVALID_PAGINATION",
            Self::InvalidSort { .. } => "INVALID_SORT",
        }
    }

    /// Whether the cursor was rejected by the integrity layer
    #[must_use]
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::InvalidPagination { source, .. } if source.is_integrity_failure())
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Error code
    pub code: String,

    /// Offending query parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl From<&PaginationError> for ErrorResponse {
    fn from(err: &PaginationError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
            parameter: Some(err.parameter().to_string()),
            status: 400,
        }
    }
}

#[cfg(feature = "http")]
impl IntoResponse for PaginationError {
    fn into_response(self) -> Response {
        tracing::debug!(
            parameter = self.parameter(),
            code = self.code(),
            "Rejecting paged request: {}", self
        );
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&self))).into_response()
    }
}
