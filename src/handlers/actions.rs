//! Handler behaviour for each route kind.

use std::sync::Arc;

use super::{HandlerError, HandlerOutcome, RouteKind};
use crate::analytics::{AnalyticsSink, EVENT_CAMPAIGN_ATTRIBUTED, EVENT_SHARED_WORKOUT_OPENED};
use crate::attribution::AttributionRecorder;
use crate::auth::{AuthGate, GateOutcome};
use crate::link::Params;
use crate::navigation::Navigator;
use crate::routing::RoutePattern;

/// Executes route handlers against the app's collaborators.
pub struct LinkHandlers {
    navigator: Arc<dyn Navigator>,
    gate: AuthGate,
    attribution: Arc<AttributionRecorder>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl LinkHandlers {
    /// Wire the handlers to the app's collaborators.
    pub fn new(
        navigator: Arc<dyn Navigator>,
        gate: AuthGate,
        attribution: Arc<AttributionRecorder>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            navigator,
            gate,
            attribution,
            analytics,
        }
    }

    /// The auth gate protected destinations go through.
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    /// Run the handler for `kind` with the link's query `params` and `path`.
    ///
    /// Side effects (attribution, analytics) run first; the destination is
    /// then opened directly or through the auth gate per
    /// [`RouteKind::requires_auth`].
    pub async fn handle(
        &self,
        kind: RouteKind,
        pattern: &RoutePattern,
        params: &Params,
        path: &str,
    ) -> Result<HandlerOutcome, HandlerError> {
        tracing::debug!(route = kind.name(), pattern = %pattern, path = %path, "Running link handler");

        let (screen, screen_params) = self.destination(kind, pattern, params, path).await?;
        if kind.requires_auth() {
            self.protected(&screen, screen_params, params).await
        } else {
            self.open(&screen, screen_params)
        }
    }

    async fn destination(
        &self,
        kind: RouteKind,
        pattern: &RoutePattern,
        params: &Params,
        path: &str,
    ) -> Result<(String, Params), HandlerError> {
        let destination = match kind {
            RouteKind::Login => (self.gate.login_screen().to_string(), params.clone()),
            RouteKind::Signup => ("Signup".to_string(), params.clone()),
            RouteKind::ResetPassword => {
                if params.get("token").map_or(true, |t| t.is_empty()) {
                    return Err(HandlerError::MissingParam("token"));
                }
                ("ResetPassword".to_string(), params.clone())
            }
            RouteKind::Workout => (
                "WorkoutDetail".to_string(),
                with_path_param(pattern, path, params, "workoutId")?,
            ),
            RouteKind::Achievement => (
                "Achievement".to_string(),
                with_path_param(pattern, path, params, "achievementId")?,
            ),
            RouteKind::Challenge => (
                "Challenge".to_string(),
                with_path_param(pattern, path, params, "challengeId")?,
            ),
            RouteKind::Friend => (
                "FriendProfile".to_string(),
                with_path_param(pattern, path, params, "userId")?,
            ),
            RouteKind::SharedWorkout => {
                let screen_params = with_path_param(pattern, path, params, "workoutId")?;
                self.analytics.record(EVENT_SHARED_WORKOUT_OPENED, &screen_params);
                ("SharedWorkout".to_string(), screen_params)
            }
            RouteKind::Invite => {
                let screen_params = with_path_param(pattern, path, params, "inviteCode")?;
                self.attribution
                    .record_invite(&screen_params["inviteCode"], params)
                    .await;
                let screen = if self.gate.is_authenticated() {
                    "Invite"
                } else {
                    "Signup"
                };
                (screen.to_string(), screen_params)
            }
            RouteKind::Campaign => {
                let screen_params = with_path_param(pattern, path, params, "campaignName")?;
                self.attribute(&screen_params["campaignName"], "campaign", params).await;
                ("Campaign".to_string(), screen_params)
            }
            RouteKind::Promo => {
                let screen_params = with_path_param(pattern, path, params, "promoCode")?;
                self.attribute(&screen_params["promoCode"], "promo", params).await;
                ("Premium".to_string(), screen_params)
            }
            RouteKind::Premium | RouteKind::Subscription => ("Premium".to_string(), params.clone()),
            RouteKind::Help => {
                let mut screen_params = params.clone();
                if let Some(topic) = pattern.wildcard_tail(path).filter(|t| !t.is_empty()) {
                    screen_params.insert("topic".to_string(), topic);
                }
                ("Help".to_string(), screen_params)
            }
            RouteKind::Support => {
                let mut screen_params = params.clone();
                screen_params.insert("topic".to_string(), "support".to_string());
                ("Help".to_string(), screen_params)
            }
        };
        Ok(destination)
    }

    fn open(&self, screen: &str, params: Params) -> Result<HandlerOutcome, HandlerError> {
        self.navigator.navigate(screen, &params)?;
        Ok(HandlerOutcome::Navigated {
            screen: screen.to_string(),
        })
    }

    async fn protected(
        &self,
        screen: &str,
        screen_params: Params,
        query: &Params,
    ) -> Result<HandlerOutcome, HandlerError> {
        let outcome = self
            .gate
            .guard(self.navigator.as_ref(), screen, screen_params, query)
            .await?;
        Ok(match outcome {
            GateOutcome::Navigated { screen } => HandlerOutcome::Navigated { screen },
            GateOutcome::RedirectedToLogin { deferred } => HandlerOutcome::AuthRequired { deferred },
        })
    }

    async fn attribute(&self, campaign: &str, medium: &str, params: &Params) {
        let attribution = self.attribution.record_campaign(campaign, medium, params).await;

        let mut properties = Params::new();
        properties.insert("campaign".to_string(), attribution.campaign);
        properties.insert("source".to_string(), attribution.source);
        properties.insert("medium".to_string(), attribution.medium);
        self.analytics.record(EVENT_CAMPAIGN_ATTRIBUTED, &properties);
    }
}

/// Query params plus the first named path segment stored under `key`.
fn with_path_param(
    pattern: &RoutePattern,
    path: &str,
    params: &Params,
    key: &'static str,
) -> Result<Params, HandlerError> {
    let value = pattern
        .extract_param(path)
        .filter(|v| !v.is_empty())
        .ok_or(HandlerError::MissingParam(key))?;

    let mut merged = params.clone();
    merged.insert(key.to_string(), value);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::RecordingSink;
    use crate::auth::StaticAuth;
    use crate::config::{AuthConfig, StorageConfig};
    use crate::handlers::ROUTE_TABLE;
    use crate::navigation::{NavigationAction, NavigationError, RecordingNavigator};
    use crate::storage::MemoryStorage;

    struct Fixture {
        navigator: Arc<RecordingNavigator>,
        storage: MemoryStorage,
        auth: Arc<StaticAuth>,
        analytics: Arc<RecordingSink>,
        handlers: LinkHandlers,
    }

    fn fixture(authenticated: bool) -> Fixture {
        let navigator = Arc::new(RecordingNavigator::ready());
        let storage = MemoryStorage::new();
        let auth = Arc::new(StaticAuth::new(authenticated));
        let analytics = Arc::new(RecordingSink::new());
        let config = StorageConfig::default();

        let gate = AuthGate::new(
            Arc::new(storage.clone()),
            auth.clone(),
            &AuthConfig::default(),
            config.pending_navigation_key.clone(),
        );
        let attribution = Arc::new(AttributionRecorder::new(Arc::new(storage.clone()), &config));
        let handlers = LinkHandlers::new(navigator.clone(), gate, attribution, analytics.clone());

        Fixture {
            navigator,
            storage,
            auth,
            analytics,
            handlers,
        }
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn run(
        f: &Fixture,
        kind: RouteKind,
        pattern: &str,
        path: &str,
        query: &Params,
    ) -> Result<HandlerOutcome, HandlerError> {
        f.handlers.handle(kind, &RoutePattern::new(pattern), query, path).await
    }

    fn navigated(screen: &str, params: Params) -> NavigationAction {
        NavigationAction::Navigate {
            screen: screen.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_protected_route_when_signed_in() {
        let f = fixture(true);
        let query = params(&[("source", "push")]);
        let outcome = run(&f, RouteKind::Workout, "/workout/:id", "/workout/5", &query).await.unwrap();

        assert_eq!(outcome, HandlerOutcome::Navigated { screen: "WorkoutDetail".into() });
        assert_eq!(
            f.navigator.actions(),
            vec![navigated("WorkoutDetail", params(&[("source", "push"), ("workoutId", "5")]))]
        );
    }

    #[tokio::test]
    async fn test_protected_route_when_signed_out() {
        let f = fixture(false);
        let query = params(&[("source", "push")]);
        let outcome = run(&f, RouteKind::Friend, "/friend/:id", "/friend/u1", &query).await.unwrap();

        assert_eq!(outcome, HandlerOutcome::AuthRequired { deferred: "FriendProfile".into() });
        assert_eq!(f.navigator.actions(), vec![navigated("Login", query)]);
        let pending = f.handlers.gate().pending().await.unwrap();
        assert_eq!(pending.params.get("userId").map(String::as_str), Some("u1"));
    }

    #[tokio::test]
    async fn test_path_param_overrides_query() {
        let f = fixture(true);
        let query = params(&[("challengeId", "spoofed")]);
        run(&f, RouteKind::Challenge, "/challenge/:id", "/challenge/real", &query).await.unwrap();
        assert_eq!(
            f.navigator.actions(),
            vec![navigated("Challenge", params(&[("challengeId", "real")]))]
        );
    }

    #[tokio::test]
    async fn test_reset_password_requires_token() {
        let f = fixture(false);
        let err = run(&f, RouteKind::ResetPassword, "/reset-password", "/reset-password", &Params::new())
            .await
            .unwrap_err();
        assert_eq!(err, HandlerError::MissingParam("token"));
        assert!(f.navigator.actions().is_empty());

        let query = params(&[("token", "t1")]);
        run(&f, RouteKind::ResetPassword, "/reset-password", "/reset-password", &query).await.unwrap();
        assert_eq!(f.navigator.actions(), vec![navigated("ResetPassword", query)]);
    }

    #[tokio::test]
    async fn test_shared_workout_is_public_and_tracked() {
        let f = fixture(false);
        let query = params(&[("sharedBy", "u1")]);
        run(&f, RouteKind::SharedWorkout, "/share/workout/:id", "/share/workout/42", &query)
            .await
            .unwrap();

        let expected = params(&[("sharedBy", "u1"), ("workoutId", "42")]);
        assert_eq!(f.navigator.actions(), vec![navigated("SharedWorkout", expected.clone())]);
        assert_eq!(f.analytics.events(), vec![(EVENT_SHARED_WORKOUT_OPENED.to_string(), expected)]);
    }

    #[tokio::test]
    async fn test_invite_depends_on_auth() {
        let f = fixture(false);
        run(&f, RouteKind::Invite, "/invite/:code", "/invite/ABC", &Params::new()).await.unwrap();
        f.auth.set(true);
        run(&f, RouteKind::Invite, "/invite/:code", "/invite/DEF", &Params::new()).await.unwrap();

        assert_eq!(
            f.navigator.actions(),
            vec![
                navigated("Signup", params(&[("inviteCode", "ABC")])),
                navigated("Invite", params(&[("inviteCode", "DEF")])),
            ]
        );
        assert!(f.storage.peek("@referral_data").unwrap().contains("DEF"));
    }

    #[tokio::test]
    async fn test_campaign_and_promo_attribution() {
        let f = fixture(false);
        let query = params(&[("utm_source", "ig")]);
        run(&f, RouteKind::Campaign, "/campaign/:name", "/campaign/summer", &query).await.unwrap();
        assert!(f.storage.peek("@campaign_attribution").unwrap().contains("summer"));

        run(&f, RouteKind::Promo, "/promo/:code", "/promo/SAVE20", &Params::new()).await.unwrap();
        let stored = f.storage.peek("@campaign_attribution").unwrap();
        assert!(stored.contains("SAVE20") && stored.contains("promo"));

        assert_eq!(
            f.navigator.actions(),
            vec![
                navigated("Campaign", params(&[("campaignName", "summer"), ("utm_source", "ig")])),
                navigated("Premium", params(&[("promoCode", "SAVE20")])),
            ]
        );
        assert_eq!(f.analytics.names(), vec![EVENT_CAMPAIGN_ATTRIBUTED, EVENT_CAMPAIGN_ATTRIBUTED]);
    }

    #[tokio::test]
    async fn test_help_topics() {
        let f = fixture(false);
        run(&f, RouteKind::Help, "/help/*", "/help/faq/billing", &Params::new()).await.unwrap();
        run(&f, RouteKind::Help, "/help/*", "/help/", &Params::new()).await.unwrap();
        run(&f, RouteKind::Support, "/support", "/support", &Params::new()).await.unwrap();

        assert_eq!(
            f.navigator.actions(),
            vec![
                navigated("Help", params(&[("topic", "faq/billing")])),
                navigated("Help", Params::new()),
                navigated("Help", params(&[("topic", "support")])),
            ]
        );
    }

    #[tokio::test]
    async fn test_navigation_failure_is_handler_error() {
        let f = fixture(false);
        f.navigator.reject_screen("Signup");
        let err = run(&f, RouteKind::Signup, "/signup", "/signup", &Params::new()).await.unwrap_err();
        assert!(matches!(err, HandlerError::Navigation(NavigationError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_premium_and_subscription_share_screen() {
        let f = fixture(true);
        run(&f, RouteKind::Premium, "/premium", "/premium", &Params::new()).await.unwrap();
        run(&f, RouteKind::Subscription, "/subscription", "/subscription", &Params::new()).await.unwrap();
        assert_eq!(
            f.navigator.actions(),
            vec![navigated("Premium", Params::new()), navigated("Premium", Params::new())]
        );
    }

    #[tokio::test]
    async fn test_gate_follows_route_protection() {
        let query = params(&[("token", "t1")]);
        for (pattern, kind) in ROUTE_TABLE {
            let f = fixture(false);
            let path = pattern
                .replace(":id", "1")
                .replace(":code", "C1")
                .replace(":name", "n1")
                .replace('*', "faq");
            let outcome = run(&f, kind, pattern, &path, &query).await.unwrap();
            assert_eq!(
                matches!(outcome, HandlerOutcome::AuthRequired { .. }),
                kind.requires_auth(),
                "pattern {}",
                pattern
            );
            assert_eq!(f.handlers.gate().pending().await.is_some(), kind.requires_auth());
        }
    }

    #[tokio::test]
    async fn test_captured_values_are_decoded() {
        let f = fixture(true);
        run(&f, RouteKind::Workout, "/workout/:id", "/workout/leg%20day", &Params::new())
            .await
            .unwrap();
        run(&f, RouteKind::Help, "/help/*", "/help/getting%20started/caf%C3%A9", &Params::new())
            .await
            .unwrap();

        assert_eq!(
            f.navigator.actions(),
            vec![
                navigated("WorkoutDetail", params(&[("workoutId", "leg day")])),
                navigated("Help", params(&[("topic", "getting started/café")])),
            ]
        );
    }
}
