//! Auth gate and deferred-navigation resume store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::AuthOracle;
use crate::config::AuthConfig;
use crate::link::Params;
use crate::navigation::{NavigationError, Navigator};
use crate::observability::metrics;
use crate::storage::{now_millis, read_json, write_json, Storage, StorageError};

/// A protected navigation deferred until the user signs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingNavigation {
    pub screen: String,
    pub params: Params,
    /// Creation time, milliseconds since epoch.
    pub timestamp: u64,
}

impl PendingNavigation {
    /// Strictly older than `ttl_ms` at `now_ms`.
    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) > ttl_ms
    }
}

/// What the gate did with a protected navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum GateOutcome {
    /// User was signed in; navigated straight to the screen.
    Navigated { screen: String },
    /// Navigation deferred; user sent to the login screen.
    RedirectedToLogin { deferred: String },
}

/// Result of a resume check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "resume", rename_all = "snake_case")]
pub enum ResumeOutcome {
    NothingPending,
    Expired { screen: String },
    Resumed { screen: String, params: Params },
    /// The target refused; the record is kept for a later attempt.
    NavigationFailed { screen: String, error: String },
}

impl ResumeOutcome {
    fn label(&self) -> &'static str {
        match self {
            ResumeOutcome::NothingPending => "nothing_pending",
            ResumeOutcome::Expired { .. } => "expired",
            ResumeOutcome::Resumed { .. } => "resumed",
            ResumeOutcome::NavigationFailed { .. } => "navigation_failed",
        }
    }
}

/// Intercepts protected navigations and replays them after sign-in.
pub struct AuthGate {
    storage: Arc<dyn Storage>,
    oracle: Arc<dyn AuthOracle>,
    key: String,
    ttl_ms: u64,
    login_screen: String,
}

impl AuthGate {
    /// Build a gate persisting its pending navigation under `key`.
    pub fn new(
        storage: Arc<dyn Storage>,
        oracle: Arc<dyn AuthOracle>,
        config: &AuthConfig,
        key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            oracle,
            key: key.into(),
            ttl_ms: config.resume_ttl_ms,
            login_screen: config.login_screen.clone(),
        }
    }

    /// Current answer from the auth oracle.
    pub fn is_authenticated(&self) -> bool {
        self.oracle.is_authenticated()
    }

    /// Screen protected links redirect to.
    pub fn login_screen(&self) -> &str {
        &self.login_screen
    }

    /// Navigate to a protected screen, or defer it behind the login screen.
    ///
    /// `query` is forwarded to the login screen so the sign-in flow keeps
    /// the link's context.
    pub async fn guard(
        &self,
        navigator: &dyn Navigator,
        screen: &str,
        params: Params,
        query: &Params,
    ) -> Result<GateOutcome, NavigationError> {
        if self.oracle.is_authenticated() {
            navigator.navigate(screen, &params)?;
            return Ok(GateOutcome::Navigated {
                screen: screen.to_string(),
            });
        }

        let pending = PendingNavigation {
            screen: screen.to_string(),
            params,
            timestamp: now_millis(),
        };
        if let Err(e) = write_json(self.storage.as_ref(), &self.key, &pending).await {
            metrics::record_storage_error("write");
            tracing::warn!(error = %e, screen = %screen, "Failed to persist pending navigation");
        }

        tracing::info!(screen = %screen, login = %self.login_screen, "Authentication required, deferring navigation");
        navigator.navigate(&self.login_screen, query)?;
        Ok(GateOutcome::RedirectedToLogin {
            deferred: screen.to_string(),
        })
    }

    /// The stored pending navigation, if any. Unreadable records count as absent.
    pub async fn pending(&self) -> Option<PendingNavigation> {
        match read_json::<PendingNavigation>(self.storage.as_ref(), &self.key).await {
            Ok(pending) => pending,
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable pending navigation");
                self.remove().await;
                None
            }
            Err(e) => {
                metrics::record_storage_error("read");
                tracing::warn!(error = %e, "Failed to load pending navigation");
                None
            }
        }
    }

    /// Replay the pending navigation using the system clock.
    pub async fn resume(&self, navigator: &dyn Navigator) -> ResumeOutcome {
        self.resume_at(navigator, now_millis()).await
    }

    /// Replay the pending navigation as of `now_ms`.
    pub async fn resume_at(&self, navigator: &dyn Navigator, now_ms: u64) -> ResumeOutcome {
        let outcome = match self.pending().await {
            None => ResumeOutcome::NothingPending,
            Some(pending) if pending.is_expired(now_ms, self.ttl_ms) => {
                tracing::info!(
                    screen = %pending.screen,
                    age_ms = now_ms.saturating_sub(pending.timestamp),
                    "Pending navigation expired"
                );
                self.remove().await;
                ResumeOutcome::Expired {
                    screen: pending.screen,
                }
            }
            Some(pending) => match navigator.navigate(&pending.screen, &pending.params) {
                Ok(()) => {
                    self.remove().await;
                    tracing::info!(screen = %pending.screen, "Resumed pending navigation");
                    ResumeOutcome::Resumed {
                        screen: pending.screen,
                        params: pending.params,
                    }
                }
                Err(e) => {
                    tracing::warn!(screen = %pending.screen, error = %e, "Resume navigation failed");
                    ResumeOutcome::NavigationFailed {
                        screen: pending.screen,
                        error: e.to_string(),
                    }
                }
            },
        };

        metrics::record_resume(outcome.label());
        outcome
    }

    /// Drop any pending navigation (e.g. on sign-out).
    pub async fn clear(&self) {
        self.remove().await;
    }

    async fn remove(&self) {
        if let Err(e) = self.storage.remove(&self.key).await {
            metrics::record_storage_error("remove");
            tracing::warn!(error = %e, "Failed to remove pending navigation");
        }
    }
}
