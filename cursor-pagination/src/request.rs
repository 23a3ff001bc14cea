//! Request targets and the identity a cursor is bound to
//!
//! [`RequestTarget`] is the strongly-typed view of an inbound request (or of a
//! link being generated): its path and its query parameters in the order they
//! appear. Scheme, host, port and userinfo are never part of it, so cursors
//! survive being replayed through a different hostname or protocol.
//!
//! [`RequestIdentity`] is derived from a target by dropping the paging
//! parameters themselves; it is what the integrity layer binds a cursor to.

use std::collections::BTreeMap;
use std::fmt;

use url::{form_urlencoded, Url};

/// Path and ordered query parameters of a request
///
/// # Example
///
/// ```rust
/// use cursor_pagination::request::RequestTarget;
///
/// let target = RequestTarget::parse("/items?page=abc&page=def&q=rust");
/// assert_eq!(target.path(), "/items");
/// assert_eq!(target.first("page"), Some("abc"));
/// assert_eq!(target.values("page").count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestTarget {
    path: String,
    query: Vec<(String, String)>,
}

impl RequestTarget {
    /// Create a target with no query parameters
    ///
    /// `.` and `..` segments are resolved so the path compares the same way
    /// whichever constructor produced it.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
            query: Vec::new(),
        }
    }

    /// Append a query parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Parse a `path?query` string; any fragment is ignored
    pub fn parse(path_and_query: &str) -> Self {
        let without_fragment = path_and_query
            .split_once('#')
            .map_or(path_and_query, |(head, _)| head);

        match without_fragment.split_once('?') {
            Some((path, query)) => Self {
                path: normalize_path(path),
                query: parse_query(query),
            },
            None => Self::new(without_fragment),
        }
    }

    /// Build from an HTTP request URI
    pub fn from_uri(uri: &http::Uri) -> Self {
        Self {
            path: normalize_path(uri.path()),
            query: uri.query().map(parse_query).unwrap_or_default(),
        }
    }

    /// Build from an absolute URL, discarding scheme, host, port and userinfo
    pub fn from_url(url: &Url) -> Self {
        Self {
            path: normalize_path(url.path()),
            query: url.query_pairs().into_owned().collect(),
        }
    }

    /// Request path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All query parameters in request order
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Values of one query parameter in request order
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First value of a query parameter
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// A copy of this target without the named query parameters
    #[must_use]
    pub fn without_params(&self, names: &[&str]) -> Self {
        Self {
            path: self.path.clone(),
            query: self
                .query
                .iter()
                .filter(|(key, _)| !names.contains(&key.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// The identity of this target, ignoring the named paging parameters
    #[must_use]
    pub fn identity(&self, excluded: &[&str]) -> RequestIdentity {
        let mut query: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in &self.query {
            if excluded.contains(&key.as_str()) {
                continue;
            }
            query.entry(key.clone()).or_default().push(value.clone());
        }

        RequestIdentity {
            path: normalize_path(&self.path),
            query,
        }
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            write!(f, "?{encoded}")?;
        }
        Ok(())
    }
}

impl From<&http::Uri> for RequestTarget {
    fn from(uri: &http::Uri) -> Self {
        Self::from_uri(uri)
    }
}

impl From<&Url> for RequestTarget {
    fn from(url: &Url) -> Self {
        Self::from_url(url)
    }
}

/// Host-independent fingerprint of a paged request
///
/// Holds the normalized path and every non-paging query parameter. Keys compare
/// without regard to order; the values of each key compare as an ordered list.
/// Page size and sort are bound separately by the codec from the
/// [`CursorContext`](crate::context::CursorContext) they travel in.
///
/// # Example
///
/// ```rust
/// use cursor_pagination::request::{RequestIdentity, RequestTarget};
///
/// let a = RequestTarget::parse("/items?b=2&a=1&page=xyz").identity(&["page"]);
/// let b = RequestTarget::parse("/items?a=1&b=2").identity(&["page"]);
/// assert_eq!(a, b);
///
/// let built = RequestIdentity::new("/items").with_param("a", "1").with_param("b", "2");
/// assert_eq!(a, built);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestIdentity {
    path: String,
    query: BTreeMap<String, Vec<String>>,
}

impl RequestIdentity {
    /// Identity of a path with no query parameters
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
            query: BTreeMap::new(),
        }
    }

    /// Add a query parameter value
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Normalized request path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters sorted by key
    #[must_use]
    pub fn query(&self) -> &BTreeMap<String, Vec<String>> {
        &self.query
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// Resolve dot segments the way `url` does for absolute URLs
///
/// Paths that are not absolute, or that carry a query or fragment delimiter,
/// are kept as given apart from mapping the empty path to `/`.
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    if !path.starts_with('/') || path.contains(['?', '#']) {
        return path.to_string();
    }

    match Url::parse(&format!("http://localhost{path}")) {
        Ok(url) => url.path().to_string(),
        Err(_) => path.to_string(),
    }
}
