//! Dispatch coordinator: the context object that owns link-handling state.

use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use super::pending::PendingLinkSlot;
use crate::analytics::{AnalyticsSink, EVENT_LINK_FALLBACK, EVENT_LINK_OPENED};
use crate::attribution::AttributionRecorder;
use crate::auth::{AuthGate, AuthOracle, ResumeOutcome};
use crate::config::DeepLinkConfig;
use crate::handlers::{default_registry, HandlerOutcome, LinkHandlers, RouteKind};
use crate::link::{parse_url, Params, ParsedLink};
use crate::navigation::{Navigator, RouteEntry};
use crate::observability::{logging, metrics};
use crate::routing::RouteRegistry;
use crate::storage::Storage;

/// External collaborators the engine drives.
#[derive(Clone)]
pub struct Collaborators {
    pub navigator: Arc<dyn Navigator>,
    pub storage: Arc<dyn Storage>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub auth: Arc<dyn AuthOracle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    /// Navigation target not mounted; links are buffered.
    Uninitialized,
    /// Links are dispatched immediately.
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    NoHandler,
    HandlerFailed(String),
}

impl FallbackReason {
    fn label(&self) -> &'static str {
        match self {
            FallbackReason::NoHandler => "no_handler",
            FallbackReason::HandlerFailed(_) => "handler_failed",
        }
    }
}

/// What happened to one incoming link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Malformed link, silently ignored.
    Dropped { error: String },
    /// Held until the navigation target is ready.
    Buffered { replaced: bool },
    /// A handler ran.
    Handled { pattern: String, result: HandlerOutcome },
    /// Stack reset to the home route.
    Fallback { reason: FallbackReason },
}

pub struct DispatchCoordinator {
    state: DispatchState,
    pending: PendingLinkSlot,
    registry: RouteRegistry<RouteKind>,
    handlers: LinkHandlers,
    attribution: Arc<AttributionRecorder>,
    navigator: Arc<dyn Navigator>,
    analytics: Arc<dyn AnalyticsSink>,
    home_route: String,
}

impl DispatchCoordinator {
    /// Build a coordinator over the fixed route table.
    pub fn new(config: &DeepLinkConfig, collaborators: Collaborators) -> Self {
        Self::with_registry(config, collaborators, default_registry())
    }

    /// Build a coordinator over a custom route table.
    pub fn with_registry(
        config: &DeepLinkConfig,
        collaborators: Collaborators,
        registry: RouteRegistry<RouteKind>,
    ) -> Self {
        let Collaborators {
            navigator,
            storage,
            analytics,
            auth,
        } = collaborators;

        let attribution = Arc::new(AttributionRecorder::new(storage.clone(), &config.storage));
        let gate = AuthGate::new(
            storage,
            auth,
            &config.auth,
            config.storage.pending_navigation_key.clone(),
        );
        let handlers = LinkHandlers::new(
            navigator.clone(),
            gate,
            attribution.clone(),
            analytics.clone(),
        );

        Self {
            state: DispatchState::Uninitialized,
            pending: PendingLinkSlot::new(),
            registry,
            handlers,
            attribution,
            navigator,
            analytics,
            home_route: config.navigation.home_route.clone(),
        }
    }

    /// Current dispatch state.
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// The link waiting for the ready signal, if any.
    pub fn pending_link(&self) -> Option<&ParsedLink> {
        self.pending.peek()
    }

    /// The route table links are resolved against.
    pub fn registry(&self) -> &RouteRegistry<RouteKind> {
        &self.registry
    }

    pub fn attribution(&self) -> &AttributionRecorder {
        &self.attribution
    }

    /// Gate holding any navigation deferred behind sign-in.
    pub fn auth_gate(&self) -> &AuthGate {
        self.handlers.gate()
    }

    /// Entry point for every delivered URI (launch URI and later deliveries).
    pub async fn handle_url(&mut self, raw: &str) -> DispatchOutcome {
        let span = logging::link_span(Uuid::new_v4(), raw);
        self.handle_url_inner(raw).instrument(span).await
    }

    async fn handle_url_inner(&mut self, raw: &str) -> DispatchOutcome {
        metrics::record_received();

        let link = match parse_url(raw) {
            Ok(link) => link,
            Err(e) => {
                tracing::debug!(error = %e, "Dropping unparseable link");
                metrics::record_dispatch("dropped");
                return DispatchOutcome::Dropped {
                    error: e.to_string(),
                };
            }
        };

        self.attribution.record_referral(&link).await;

        match self.state {
            DispatchState::Ready => self.dispatch(&link).await,
            DispatchState::Uninitialized => {
                let path = link.path.clone();
                let replaced = self.pending.hold(link).is_some();
                if replaced {
                    metrics::record_pending_overwrite();
                    tracing::info!(path = %path, "Replaced buffered link with newer one");
                }

                if self.navigator.is_ready().await {
                    if let Some(outcome) = self.on_ready().await {
                        return outcome;
                    }
                }

                tracing::debug!(path = %path, "Navigation not ready, link buffered");
                metrics::record_dispatch("buffered");
                DispatchOutcome::Buffered { replaced }
            }
        }
    }

    /// Ready signal from the navigation target.
    ///
    /// Replays the buffered link (if any) and switches to `Ready` for good.
    /// Later signals are no-ops.
    pub async fn on_ready(&mut self) -> Option<DispatchOutcome> {
        if self.state == DispatchState::Ready {
            return None;
        }

        let drained = match self.pending.take() {
            Some(link) => {
                tracing::info!(path = %link.path, "Replaying buffered link");
                Some(self.dispatch(&link).await)
            }
            None => None,
        };

        self.state = DispatchState::Ready;
        tracing::info!("Navigation ready, dispatching links immediately");
        drained
    }

    /// Replay a navigation deferred by the auth gate. Call after sign-in.
    pub async fn resume_after_auth(&mut self) -> ResumeOutcome {
        self.handlers.gate().resume(self.navigator.as_ref()).await
    }

    async fn dispatch(&self, link: &ParsedLink) -> DispatchOutcome {
        let Some(route) = self.registry.resolve(&link.path) else {
            tracing::info!(path = %link.path, "No route for link");
            return self.fallback(link, FallbackReason::NoHandler);
        };

        let kind = *route.handler;
        match self
            .handlers
            .handle(kind, route.pattern, &link.params, &link.path)
            .await
        {
            Ok(result) => {
                let mut properties = Params::new();
                properties.insert("url".to_string(), link.original_url.clone());
                properties.insert("path".to_string(), link.path.clone());
                properties.insert("route".to_string(), route.pattern.to_string());
                self.analytics.record(EVENT_LINK_OPENED, &properties);
                metrics::record_dispatch("handled");

                DispatchOutcome::Handled {
                    pattern: route.pattern.to_string(),
                    result,
                }
            }
            Err(e) => {
                tracing::warn!(route = kind.name(), path = %link.path, error = %e, "Link handler failed");
                self.fallback(link, FallbackReason::HandlerFailed(e.to_string()))
            }
        }
    }

    fn fallback(&self, link: &ParsedLink, reason: FallbackReason) -> DispatchOutcome {
        let routes = [RouteEntry::new(self.home_route.clone(), link.params.clone())];
        if let Err(e) = self.navigator.reset_to(&routes) {
            tracing::error!(error = %e, home = %self.home_route, "Fallback navigation failed");
        }

        let mut properties = Params::new();
        properties.insert("url".to_string(), link.original_url.clone());
        properties.insert("path".to_string(), link.path.clone());
        properties.insert("reason".to_string(), reason.label().to_string());
        self.analytics.record(EVENT_LINK_FALLBACK, &properties);
        metrics::record_dispatch("fallback");

        DispatchOutcome::Fallback { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::RecordingSink;
    use crate::auth::StaticAuth;
    use crate::navigation::{NavigationAction, RecordingNavigator};
    use crate::storage::MemoryStorage;

    fn coordinator(navigator: &Arc<RecordingNavigator>) -> (DispatchCoordinator, Arc<RecordingSink>) {
        let analytics = Arc::new(RecordingSink::new());
        let collaborators = Collaborators {
            navigator: navigator.clone(),
            storage: Arc::new(MemoryStorage::new()),
            analytics: analytics.clone(),
            auth: Arc::new(StaticAuth::new(true)),
        };
        (DispatchCoordinator::new(&DeepLinkConfig::default(), collaborators), analytics)
    }

    #[tokio::test]
    async fn test_ready_navigator_dispatches_on_first_link() {
        let navigator = Arc::new(RecordingNavigator::ready());
        let (mut coordinator, analytics) = coordinator(&navigator);
        assert_eq!(coordinator.state(), DispatchState::Uninitialized);

        let outcome = coordinator.handle_url("bulge://workout/5").await;
        assert!(matches!(outcome, DispatchOutcome::Handled { ref pattern, .. } if pattern == "/workout/:id"));
        assert_eq!(coordinator.state(), DispatchState::Ready);
        assert!(coordinator.pending_link().is_none());
        assert_eq!(analytics.names(), vec![EVENT_LINK_OPENED]);
    }

    #[tokio::test]
    async fn test_dropped_link_has_no_side_effects() {
        let navigator = Arc::new(RecordingNavigator::ready());
        let (mut coordinator, analytics) = coordinator(&navigator);

        let outcome = coordinator.handle_url("not a link").await;
        assert!(matches!(outcome, DispatchOutcome::Dropped { .. }));
        assert!(navigator.actions().is_empty());
        assert!(analytics.events().is_empty());
        // Still waiting for a first real link
        assert_eq!(coordinator.state(), DispatchState::Uninitialized);
    }

    #[tokio::test]
    async fn test_fallback_carries_raw_params() {
        let navigator = Arc::new(RecordingNavigator::ready());
        let (mut coordinator, analytics) = coordinator(&navigator);
        coordinator.on_ready().await;

        let outcome = coordinator.handle_url("bulge://nowhere?x=1").await;
        assert_eq!(outcome, DispatchOutcome::Fallback { reason: FallbackReason::NoHandler });

        let mut params = Params::new();
        params.insert("x".to_string(), "1".to_string());
        assert_eq!(
            navigator.actions(),
            vec![NavigationAction::Reset { routes: vec![RouteEntry::new("Home", params)] }]
        );
        let events = analytics.events();
        let (event, props) = &events[0];
        assert_eq!(event, EVENT_LINK_FALLBACK);
        assert_eq!(props.get("reason").map(String::as_str), Some("no_handler"));
    }

    #[tokio::test]
    async fn test_on_ready_is_one_shot() {
        let navigator = Arc::new(RecordingNavigator::not_ready());
        let (mut coordinator, _) = coordinator(&navigator);

        assert_eq!(
            coordinator.handle_url("bulge://premium").await,
            DispatchOutcome::Buffered { replaced: false }
        );
        navigator.set_ready(true);
        assert!(coordinator.on_ready().await.is_some());
        assert!(coordinator.on_ready().await.is_none());
        assert_eq!(navigator.actions().len(), 1);
    }
}
