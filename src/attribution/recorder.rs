//! Attribution persistence.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::link::{Params, ParsedLink};
use crate::observability::metrics;
use crate::storage::{now_millis, read_json, write_json, Storage};

const DEFAULT_SOURCE: &str = "deep_link";
const DEFAULT_MEDIUM: &str = "link";

/// Who referred the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralData {
    pub referrer: String,
    pub source: String,
    pub medium: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub timestamp: u64,
}

/// Which marketing campaign brought the user in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignAttribution {
    pub campaign: String,
    pub source: String,
    pub medium: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub timestamp: u64,
}

pub struct AttributionRecorder {
    storage: Arc<dyn Storage>,
    referral_key: String,
    campaign_key: String,
}

impl AttributionRecorder {
    pub fn new(storage: Arc<dyn Storage>, config: &StorageConfig) -> Self {
        Self {
            storage,
            referral_key: config.referral_key.clone(),
            campaign_key: config.campaign_key.clone(),
        }
    }

    /// Persist a referral if the link carries `ref` or `referrer`.
    pub async fn record_referral(&self, link: &ParsedLink) -> Option<ReferralData> {
        let referrer = first_param(&link.params, &["ref", "referrer"])?;
        let referral = ReferralData {
            referrer,
            source: first_param(&link.params, &["source", "utm_source"])
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            medium: first_param(&link.params, &["medium", "utm_medium"])
                .unwrap_or_else(|| DEFAULT_MEDIUM.to_string()),
            content: first_param(&link.params, &["content", "utm_content"]),
            timestamp: now_millis(),
        };

        self.store(&self.referral_key, &referral).await;
        tracing::debug!(referrer = %referral.referrer, source = %referral.source, "Referral recorded");
        Some(referral)
    }

    /// Persist a referral from an explicit referrer (invite codes).
    pub async fn record_invite(&self, code: &str, params: &Params) -> ReferralData {
        let referral = ReferralData {
            referrer: code.to_string(),
            source: first_param(params, &["source", "utm_source"])
                .unwrap_or_else(|| "invite".to_string()),
            medium: first_param(params, &["medium", "utm_medium"])
                .unwrap_or_else(|| DEFAULT_MEDIUM.to_string()),
            content: first_param(params, &["content", "utm_content"]),
            timestamp: now_millis(),
        };
        self.store(&self.referral_key, &referral).await;
        referral
    }

    /// Persist campaign attribution. `default_medium` applies when the link
    /// carries no `medium`/`utm_medium`.
    pub async fn record_campaign(
        &self,
        campaign: &str,
        default_medium: &str,
        params: &Params,
    ) -> CampaignAttribution {
        let attribution = CampaignAttribution {
            campaign: campaign.to_string(),
            source: first_param(params, &["source", "utm_source"])
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            medium: first_param(params, &["medium", "utm_medium"])
                .unwrap_or_else(|| default_medium.to_string()),
            content: first_param(params, &["content", "utm_content"]),
            timestamp: now_millis(),
        };

        self.store(&self.campaign_key, &attribution).await;
        tracing::debug!(campaign = %campaign, medium = %attribution.medium, "Campaign attribution recorded");
        attribution
    }

    /// Last persisted referral.
    pub async fn referral(&self) -> Option<ReferralData> {
        self.load(&self.referral_key).await
    }

    /// Last persisted campaign attribution.
    pub async fn campaign(&self) -> Option<CampaignAttribution> {
        self.load(&self.campaign_key).await
    }

    /// Forget both records.
    pub async fn clear(&self) {
        for key in [&self.referral_key, &self.campaign_key] {
            if let Err(e) = self.storage.remove(key).await {
                metrics::record_storage_error("remove");
                tracing::warn!(key = %key, error = %e, "Failed to clear attribution");
            }
        }
    }

    async fn store<T: Serialize + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = write_json(self.storage.as_ref(), key, value).await {
            metrics::record_storage_error("write");
            tracing::warn!(key = %key, error = %e, "Failed to persist attribution");
        }
    }

    async fn load<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        read_json(self.storage.as_ref(), key)
            .await
            .map_err(|e| {
                metrics::record_storage_error("read");
                tracing::warn!(key = %key, error = %e, "Failed to load attribution");
            })
            .ok()
            .flatten()
    }
}

fn first_param(params: &Params, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| params.get(*k))
        .find(|v| !v.is_empty())
        .cloned()
}
