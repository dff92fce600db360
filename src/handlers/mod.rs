//! Route handlers.
//!
//! # Data Flow
//! ```text
//! RouteMatch<RouteKind> + ParsedLink { params, path }
//!     → actions.rs (LinkHandlers::handle)
//!     → attribution side effects (invite, campaign, promo)
//!     → AuthGate for protected screens
//!     → Navigator::navigate
//! ```
//!
//! # Design Decisions
//! - One enum variant per registered pattern; handling is an exhaustive match
//! - `ROUTE_TABLE` order is the registration order and therefore the
//!   tie-break between dynamic patterns
//! - Path parameters are merged over the query parameters

pub mod actions;

use serde::Serialize;
use thiserror::Error;

use crate::navigation::NavigationError;
use crate::routing::RouteRegistry;

pub use actions::LinkHandlers;

/// Every kind of in-app destination a link can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Login,
    Signup,
    ResetPassword,
    Workout,
    Achievement,
    Challenge,
    SharedWorkout,
    Invite,
    Friend,
    Campaign,
    Promo,
    Premium,
    Subscription,
    Help,
    Support,
}

/// The fixed route table, in registration order.
pub const ROUTE_TABLE: [(&str, RouteKind); 15] = [
    ("/login", RouteKind::Login),
    ("/signup", RouteKind::Signup),
    ("/reset-password", RouteKind::ResetPassword),
    ("/workout/:id", RouteKind::Workout),
    ("/achievement/:id", RouteKind::Achievement),
    ("/challenge/:id", RouteKind::Challenge),
    ("/share/workout/:id", RouteKind::SharedWorkout),
    ("/invite/:code", RouteKind::Invite),
    ("/friend/:id", RouteKind::Friend),
    ("/campaign/:name", RouteKind::Campaign),
    ("/promo/:code", RouteKind::Promo),
    ("/premium", RouteKind::Premium),
    ("/subscription", RouteKind::Subscription),
    ("/help/*", RouteKind::Help),
    ("/support", RouteKind::Support),
];

impl RouteKind {
    /// Whether the destination is only reachable when signed in.
    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            RouteKind::Workout
                | RouteKind::Achievement
                | RouteKind::Challenge
                | RouteKind::Friend
                | RouteKind::Premium
                | RouteKind::Subscription
        )
    }

    /// Stable snake_case label used in logs.
    pub fn name(self) -> &'static str {
        match self {
            RouteKind::Login => "login",
            RouteKind::Signup => "signup",
            RouteKind::ResetPassword => "reset_password",
            RouteKind::Workout => "workout",
            RouteKind::Achievement => "achievement",
            RouteKind::Challenge => "challenge",
            RouteKind::SharedWorkout => "shared_workout",
            RouteKind::Invite => "invite",
            RouteKind::Friend => "friend",
            RouteKind::Campaign => "campaign",
            RouteKind::Promo => "promo",
            RouteKind::Premium => "premium",
            RouteKind::Subscription => "subscription",
            RouteKind::Help => "help",
            RouteKind::Support => "support",
        }
    }
}

/// Registry holding the fixed route table.
pub fn default_registry() -> RouteRegistry<RouteKind> {
    let mut registry = RouteRegistry::new();
    for (pattern, kind) in ROUTE_TABLE {
        registry.register(pattern, kind);
    }
    registry
}

/// Failures raised inside a handler; the coordinator turns them into a fallback.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error("missing required parameter '{0}'")]
    MissingParam(&'static str),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// What a handler did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum HandlerOutcome {
    /// Navigated to the destination.
    Navigated { screen: String },
    /// Destination deferred behind the login screen.
    AuthRequired { deferred: String },
}
