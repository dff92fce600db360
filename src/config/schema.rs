//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the deep-link engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DeepLinkConfig {
    /// Link scheme and universal-link base.
    pub links: LinksConfig,

    /// Authentication gate settings.
    pub auth: AuthConfig,

    /// Navigation entry points.
    pub navigation: NavigationConfig,

    /// Persistent storage keys and backend.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Link scheme configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    /// Custom app scheme without `://` (e.g., "bulge").
    pub scheme: String,

    /// Base of universal links (e.g., "https://bulge.app").
    pub base_url: String,

    /// Value of the `source` marker written into share links.
    pub share_source: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            scheme: "bulge".to_string(),
            base_url: "https://bulge.app".to_string(),
            share_source: "app_share".to_string(),
        }
    }
}

/// Authentication gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// How long a deferred navigation stays resumable, in milliseconds.
    pub resume_ttl_ms: u64,

    /// Screen that unauthenticated users are redirected to.
    pub login_screen: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            resume_ttl_ms: 3_600_000,
            login_screen: "Login".to_string(),
        }
    }
}

/// Navigation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Route the fallback resets the stack to.
    pub home_route: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            home_route: "Home".to_string(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Key of the deferred navigation record.
    pub pending_navigation_key: String,

    /// Key of the referral record.
    pub referral_key: String,

    /// Key of the campaign attribution record.
    pub campaign_key: String,

    /// JSON file backing the file store. In-memory when unset.
    pub state_file: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            pending_navigation_key: "@pending_navigation".to_string(),
            referral_key: "@referral_data".to_string(),
            campaign_key: "@campaign_attribution".to_string(),
            state_file: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config: DeepLinkConfig = toml::from_str("").unwrap();
        assert_eq!(config, DeepLinkConfig::default());
        assert_eq!(config.auth.resume_ttl_ms, 3_600_000);
        assert_eq!(config.links.share_source, "app_share");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: DeepLinkConfig = toml::from_str(
            r#"
            [links]
            scheme = "fitapp"

            [storage]
            state_file = "/tmp/links.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.links.scheme, "fitapp");
        assert_eq!(config.links.base_url, "https://bulge.app");
        assert_eq!(config.storage.state_file.as_deref(), Some("/tmp/links.json"));
        assert_eq!(config.storage.referral_key, "@referral_data");
    }
}
