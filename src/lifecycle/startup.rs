//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the dispatch coordinator once from config and collaborators
//! - Feed the URI the process was launched with, if any

use crate::config::DeepLinkConfig;
use crate::dispatch::{Collaborators, DispatchCoordinator, DispatchOutcome};

/// Construct the coordinator and handle the launch URI.
pub async fn bootstrap(
    config: &DeepLinkConfig,
    collaborators: Collaborators,
    initial_url: Option<&str>,
) -> (DispatchCoordinator, Option<DispatchOutcome>) {
    let mut coordinator = DispatchCoordinator::new(config, collaborators);

    tracing::info!(
        scheme = %config.links.scheme,
        routes = coordinator.registry().len(),
        launch_link = initial_url.is_some(),
        "Deep-link engine started"
    );

    let outcome = match initial_url {
        Some(url) => Some(coordinator.handle_url(url).await),
        None => None,
    };
    (coordinator, outcome)
}
