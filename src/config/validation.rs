//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the scheme and base URL can actually be routed
//! - Validate value ranges (TTL > 0, names non-empty)
//! - Detect storage key collisions
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeepLinkConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::config::schema::DeepLinkConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &DeepLinkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let scheme = &config.links.scheme;
    if !is_valid_scheme(scheme) {
        errors.push(ValidationError::new(
            "links.scheme",
            format!("'{}' is not a valid URI scheme", scheme),
        ));
    } else if scheme == "http" || scheme == "https" {
        errors.push(ValidationError::new(
            "links.scheme",
            "app scheme must differ from http/https",
        ));
    }

    match Url::parse(&config.links.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
        Ok(_) => errors.push(ValidationError::new(
            "links.base_url",
            "must be an absolute http(s) URL",
        )),
        Err(e) => errors.push(ValidationError::new(
            "links.base_url",
            format!("invalid URL: {}", e),
        )),
    }

    if config.links.share_source.is_empty() {
        errors.push(ValidationError::new("links.share_source", "must not be empty"));
    }

    if config.auth.resume_ttl_ms == 0 {
        errors.push(ValidationError::new("auth.resume_ttl_ms", "must be greater than 0"));
    }
    if config.auth.login_screen.trim().is_empty() {
        errors.push(ValidationError::new("auth.login_screen", "must not be empty"));
    }
    if config.navigation.home_route.trim().is_empty() {
        errors.push(ValidationError::new("navigation.home_route", "must not be empty"));
    }

    let keys = [
        ("storage.pending_navigation_key", &config.storage.pending_navigation_key),
        ("storage.referral_key", &config.storage.referral_key),
        ("storage.campaign_key", &config.storage.campaign_key),
    ];
    let mut seen = HashSet::new();
    for (field, key) in keys {
        if key.is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        } else if !seen.insert(key.as_str()) {
            errors.push(ValidationError::new(
                field,
                format!("key '{}' is used by another record", key),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
