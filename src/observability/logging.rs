//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the binary
//! - Provide the per-link span
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Library code only emits events; only the binary installs a subscriber

use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Default filter directive for a configured level.
pub fn default_directive(level: &str) -> String {
    format!("bulge_deeplink={level},deeplink={level}")
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Span wrapping the handling of one incoming link.
pub fn link_span(link_id: Uuid, url: &str) -> Span {
    tracing::info_span!("deep_link", link_id = %link_id, url = %url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("debug"), "bulge_deeplink=debug,deeplink=debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging("info");
        init_logging("debug");
        let _guard = link_span(Uuid::new_v4(), "bulge://x").entered();
        tracing::info!("inside link span");
    }
}
