pub mod decode;
pub mod encode;

use cursor_pagination::request::RequestTarget;
use url::Url;

/// A URL given on the command line
///
/// Absolute URLs keep their scheme and authority in the output; anything else
/// is treated as a bare `path?query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Absolute(Url),
    Relative(RequestTarget),
}

impl Location {
    pub fn parse(input: &str) -> Self {
        match Url::parse(input) {
            Ok(url) if url.has_host() => Self::Absolute(url),
            _ => Self::Relative(RequestTarget::parse(input)),
        }
    }

    pub fn target(&self) -> RequestTarget {
        match self {
            Self::Absolute(url) => RequestTarget::from_url(url),
            Self::Relative(target) => target.clone(),
        }
    }
}
