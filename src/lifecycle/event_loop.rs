//! Sequential event loop feeding the coordinator.

use tokio::sync::{broadcast, mpsc};

use crate::dispatch::DispatchCoordinator;

/// Events delivered by the host app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A URI was delivered while the app was running.
    Url(String),
    /// The navigation container finished mounting.
    NavigationReady,
    /// The user just signed in; deferred navigation may resume.
    Authenticated,
}

/// Process events one at a time until the channel closes or shutdown fires.
///
/// Returns the coordinator so callers can inspect or reuse its state.
pub async fn run_event_loop(
    mut coordinator: DispatchCoordinator,
    mut events: mpsc::Receiver<LinkEvent>,
    mut shutdown: broadcast::Receiver<()>,
) -> DispatchCoordinator {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => process(&mut coordinator, event).await,
                None => {
                    tracing::debug!("Link event channel closed");
                    break;
                }
            },
            _ = shutdown.recv() => {
                tracing::info!("Link event loop received shutdown signal, exiting loop");
                break;
            }
        }
    }
    coordinator
}

async fn process(coordinator: &mut DispatchCoordinator, event: LinkEvent) {
    match event {
        LinkEvent::Url(url) => {
            let outcome = coordinator.handle_url(&url).await;
            tracing::debug!(outcome = ?outcome, "Link handled");
        }
        LinkEvent::NavigationReady => {
            if let Some(outcome) = coordinator.on_ready().await {
                tracing::debug!(outcome = ?outcome, "Buffered link replayed");
            }
        }
        LinkEvent::Authenticated => {
            let outcome = coordinator.resume_after_auth().await;
            tracing::debug!(outcome = ?outcome, "Resume check finished");
        }
    }
}
