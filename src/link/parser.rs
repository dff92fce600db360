//! URI decomposition.
//!
//! # Responsibilities
//! - Split a raw URI into hostname, path and decoded query parameters
//! - Fold the host of app-scheme links into the path
//!
//! # Design Decisions
//! - `http`/`https` links: the host is the web domain, the path is the route
//! - Any other scheme: the host is the first route segment
//!   (`bulge://workout/5` routes like `https://bulge.app/workout/5`)
//! - A host with no path yields `"/" + host`; `bulge://help/` keeps its
//!   trailing slash as `/help/`

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::Params;

/// Reasons a raw URI could not be decomposed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or whitespace.
    #[error("empty link")]
    Empty,

    /// Input is not an absolute URI.
    #[error("invalid link: {0}")]
    Invalid(#[from] url::ParseError),

    /// URI carries no routable component (e.g. `mailto:` style).
    #[error("link has no routable path: {0}")]
    NotRoutable(String),
}

/// A decomposed incoming link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLink {
    /// The URI exactly as delivered.
    pub original_url: String,
    /// Host component, if any.
    pub hostname: Option<String>,
    /// Route path, always beginning with `/`.
    pub path: String,
    /// Decoded query parameters.
    pub params: Params,
}

impl ParsedLink {
    /// Look up a query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Parse a raw URI into a [`ParsedLink`].
pub fn parse_url(raw: &str) -> Result<ParsedLink, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let url = Url::parse(trimmed)?;
    if url.cannot_be_a_base() {
        return Err(ParseError::NotRoutable(trimmed.to_string()));
    }

    let hostname = url
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string);

    let path = match (url.scheme(), hostname.as_deref()) {
        ("http" | "https", _) | (_, None) => normalize_root(url.path()),
        (_, Some(host)) => {
            let rest = url.path();
            if rest.is_empty() {
                format!("/{}", host)
            } else {
                format!("/{}{}", host, rest)
            }
        }
    };

    let mut params = Params::new();
    for (key, value) in url.query_pairs() {
        params.insert(key.into_owned(), value.into_owned());
    }

    Ok(ParsedLink {
        original_url: raw.to_string(),
        hostname,
        path,
        params,
    })
}

fn normalize_root(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
