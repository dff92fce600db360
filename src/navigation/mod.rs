//! Navigation collaborator contract.
//!
//! # Data Flow
//! ```text
//! handlers / dispatch coordinator
//!     → Navigator::navigate(screen, params) | Navigator::reset_to(routes)
//!     → host UI framework performs the transition
//!
//! host UI framework
//!     → Navigator::is_ready() (polled by the coordinator)
//! ```
//!
//! # Design Decisions
//! - Readiness is the only asynchronous boundary on this contract
//! - Navigation calls are fallible; failures surface as `HandlerError`
//! - `recorder.rs` is a headless implementation used by the CLI and tests

pub mod recorder;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::link::Params;

pub use recorder::RecordingNavigator;

/// Errors reported by the navigation target.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The navigation container is not mounted yet.
    #[error("navigation target is not ready")]
    NotReady,

    /// The target refused the transition (unknown screen, bad params).
    #[error("navigation rejected: {0}")]
    Rejected(String),
}

/// One entry of a navigation stack reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub name: String,
    pub params: Params,
}

impl RouteEntry {
    pub fn new(name: impl Into<String>, params: Params) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// A navigation performed against the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigationAction {
    Navigate { screen: String, params: Params },
    Reset { routes: Vec<RouteEntry> },
}

/// The screen-transition framework, seen through the narrow contract the
/// link engine needs.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Whether the navigation container can accept transitions.
    async fn is_ready(&self) -> bool;

    /// Push or jump to a screen.
    fn navigate(&self, screen: &str, params: &Params) -> Result<(), NavigationError>;

    /// Replace the whole navigation stack.
    fn reset_to(&self, routes: &[RouteEntry]) -> Result<(), NavigationError>;
}
