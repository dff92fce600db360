//! Shareable link generation (the inverse of parsing).

use url::form_urlencoded;
use url::Url;

use super::{ParseError, Params};
use crate::config::LinksConfig;

/// Builds canonical links that route back into the app.
#[derive(Debug, Clone)]
pub struct LinkGenerator {
    base_url: Url,
    scheme: String,
    share_source: String,
}

impl LinkGenerator {
    /// Create a generator for the given universal-link base and app scheme.
    pub fn new(
        base_url: &str,
        scheme: impl Into<String>,
        share_source: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ParseError::NotRoutable(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            scheme: scheme.into(),
            share_source: share_source.into(),
        })
    }

    /// Create a generator from the `[links]` config section.
    pub fn from_config(config: &LinksConfig) -> Result<Self, ParseError> {
        Self::new(&config.base_url, &config.scheme, &config.share_source)
    }

    /// Produce a share link for a piece of content.
    ///
    /// `workout`, `achievement`, `invite` and `premium` map onto their
    /// routes; any other kind yields the bare base URL. The `source` marker
    /// is always present unless the caller supplies its own `source`.
    pub fn share_link(&self, kind: &str, id: &str, params: &Params) -> String {
        let segments: Option<Vec<&str>> = match kind {
            "workout" => Some(vec!["share", "workout", id]),
            "achievement" => Some(vec!["achievement", id]),
            "invite" => Some(vec!["invite", id]),
            "premium" => Some(vec!["premium"]),
            _ => None,
        };

        let mut url = self.base_url.clone();
        if let Some(segments) = segments {
            if let Ok(mut path) = url.path_segments_mut() {
                path.clear().extend(segments);
            }
        }

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            if !params.contains_key("source") {
                query.append_pair("source", &self.share_source);
            }
            query.extend_pairs(params.iter());
        }

        url.to_string()
    }

    /// Produce an app-scheme link for an arbitrary route path.
    pub fn app_link(&self, path: &str, params: &Params) -> String {
        let mut link = format!("{}://{}", self.scheme, path.trim_start_matches('/'));
        if !params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter())
                .finish();
            link.push('?');
            link.push_str(&query);
        }
        link
    }
}
