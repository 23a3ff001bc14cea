//! Integrity checking for cursors
//!
//! Wraps any [`CursorCodec`] and prefixes its tokens with a checksum over the
//! request the cursor was issued for. Presenting the cursor against any other
//! request (different path, query parameters, page size or sort) or altering
//! the wrapped token fails with [`IntegrityCheckFailed`].
//!
//! # Token format
//!
//! ```text
//! <checksum>              wrapped codec produced no token
//! <checksum>.<inner>      otherwise; the first '.' separates the two parts
//! ```
//!
//! The checksum is the first 8 bytes of a BLAKE3 digest, base64url encoded
//! without padding, so it is always [`CHECKSUM_LEN`] characters long and never
//! contains the separator.
//!
//! The digest input is a length-prefixed encoding of, in order: the request
//! path, the query parameters sorted by key with their values in request
//! order, the page size, the sort keys, and the wrapped token (tagged so that
//! an absent token differs from an empty one). Scheme, host, port and
//! userinfo are not part of it.
//!
//! Without a key the checksum is tamper evidence, not authentication: anyone
//! who knows the format can mint a valid cursor. Configure a secret with
//! [`IntegrityCheckingCodec::keyed`] to make the checksum a keyed hash.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::context::{CursorContext, PagingRequest};
use crate::error::{CursorDecodeError, IntegrityCheckFailed, IntegrityFailure};
use crate::request::RequestIdentity;
use crate::sort::{Direction, SortSpecification};

use super::CursorCodec;

/// Length of the checksum prefix in characters
pub const CHECKSUM_LEN: usize = 11;

/// Separator between the checksum and the wrapped token
pub const CHECKSUM_SEPARATOR: char = '.';

const DIGEST_BYTES: usize = 8;
const DOMAIN: &[u8] = b"cursor-pagination/integrity/v1";
const KEY_DERIVATION_CONTEXT: &str = "cursor-pagination integrity v1";

const TOKEN_ABSENT: u8 = 0;
const TOKEN_PRESENT: u8 = 1;

/// Decorator binding cursors to the request they were issued for
///
/// # Example
///
/// ```rust
/// use cursor_pagination::codec::{CursorCodec, IntegrityCheckingCodec, SimplePageCodec, CHECKSUM_LEN};
/// use cursor_pagination::context::PagingRequest;
/// use cursor_pagination::request::RequestIdentity;
/// use cursor_pagination::sort::SortSpecification;
///
/// let codec = IntegrityCheckingCodec::new(SimplePageCodec);
/// let identity = RequestIdentity::new("/items");
/// let context = codec.encode(&PagingRequest::new(4, 20, SortSpecification::unsorted()), &identity);
///
/// let token = context.cursor().unwrap();
/// assert_eq!(token.len(), CHECKSUM_LEN + 2);
/// assert!(token.ends_with(".4"));
/// ```
#[derive(Clone)]
pub struct IntegrityCheckingCodec<C> {
    inner: C,
    key: Option<[u8; 32]>,
}

impl<C> IntegrityCheckingCodec<C> {
    /// Wrap `inner` with an unkeyed checksum
    pub fn new(inner: C) -> Self {
        Self { inner, key: None }
    }

    /// Wrap `inner` with a checksum keyed by a secret
    ///
    /// The 32-byte hash key is derived from `secret`, so secrets of any length
    /// are accepted. Cursors minted under one secret fail under another.
    pub fn keyed(inner: C, secret: impl AsRef<[u8]>) -> Self {
        Self {
            inner,
            key: Some(blake3::derive_key(KEY_DERIVATION_CONTEXT, secret.as_ref())),
        }
    }

    /// The wrapped codec
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Whether checksums are keyed
    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }

    fn checksum(
        &self,
        identity: &RequestIdentity,
        page_size: u32,
        sort: &SortSpecification,
        inner_token: Option<&str>,
    ) -> String {
        let mut hasher = match &self.key {
            Some(key) => blake3::Hasher::new_keyed(key),
            None => blake3::Hasher::new(),
        };

        hasher.update(DOMAIN);

        write_str(&mut hasher, identity.path());
        write_len(&mut hasher, identity.query().len());
        for (name, values) in identity.query() {
            write_str(&mut hasher, name);
            write_len(&mut hasher, values.len());
            for value in values {
                write_str(&mut hasher, value);
            }
        }

        hasher.update(&u64::from(page_size).to_le_bytes());

        write_len(&mut hasher, sort.len());
        for order in sort.orders() {
            write_str(&mut hasher, &order.property);
            hasher.update(&[direction_tag(order.direction)]);
        }

        match inner_token {
            None => {
                hasher.update(&[TOKEN_ABSENT]);
            }
            Some(token) => {
                hasher.update(&[TOKEN_PRESENT]);
                write_str(&mut hasher, token);
            }
        }

        let digest = hasher.finalize();
        URL_SAFE_NO_PAD.encode(&digest.as_bytes()[..DIGEST_BYTES])
    }
}

impl<C: CursorCodec> CursorCodec for IntegrityCheckingCodec<C> {
    fn decode(
        &self,
        context: &CursorContext,
        identity: &RequestIdentity,
    ) -> Result<PagingRequest, CursorDecodeError> {
        let Some(token) = context.cursor() else {
            return self.inner.decode(context, identity);
        };

        let (checksum, inner_token) = split_token(token);

        if !is_well_formed(checksum) {
            tracing::warn!(
                path = identity.path(),
                "Rejected pagination cursor with malformed checksum"
            );
            return Err(IntegrityCheckFailed::new(IntegrityFailure::MalformedChecksum).into());
        }

        let expected = self.checksum(identity, context.page_size(), context.sort(), inner_token);
        if !constant_time_eq(expected.as_bytes(), checksum.as_bytes()) {
            tracing::warn!(
                path = identity.path(),
                page_size = context.page_size(),
                "Rejected pagination cursor issued for a different request"
            );
            return Err(IntegrityCheckFailed::new(IntegrityFailure::ChecksumMismatch).into());
        }

        let inner_context = context.with_cursor(inner_token.map(str::to_string));
        self.inner.decode(&inner_context, identity)
    }

    fn encode(&self, request: &PagingRequest, identity: &RequestIdentity) -> CursorContext {
        let inner = self.inner.encode(request, identity);
        let checksum = self.checksum(identity, inner.page_size(), inner.sort(), inner.cursor());

        let token = match inner.cursor() {
            Some(inner_token) => format!("{checksum}{CHECKSUM_SEPARATOR}{inner_token}"),
            None => checksum,
        };

        inner.with_cursor(Some(token))
    }
}

impl<C: fmt::Debug> fmt::Debug for IntegrityCheckingCodec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrityCheckingCodec")
            .field("inner", &self.inner)
            .field("key", &self.key.map(|_| "<redacted>"))
            .finish()
    }
}

fn split_token(token: &str) -> (&str, Option<&str>) {
    match token.split_once(CHECKSUM_SEPARATOR) {
        Some((checksum, inner)) => (checksum, Some(inner)),
        None => (token, None),
    }
}

fn is_well_formed(checksum: &str) -> bool {
    checksum.len() == CHECKSUM_LEN
        && checksum
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn direction_tag(direction: Direction) -> u8 {
    match direction {
        Direction::Ascending => b'a',
        Direction::Descending => b'd',
    }
}

fn write_len(hasher: &mut blake3::Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn write_str(hasher: &mut blake3::Hasher, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}
