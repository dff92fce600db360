//! Analytics sink contract.
//!
//! # Design Decisions
//! - Recording is fire-and-forget; sinks must never fail the caller
//! - Event names are snake_case constants defined here
//! - `TracingSink` forwards events into structured logs and counters

use std::sync::Mutex;

use crate::link::Params;
use crate::observability::metrics;

/// Emitted when a link reaches a handler.
pub const EVENT_LINK_OPENED: &str = "deep_link_opened";
/// Emitted when a link falls back to the home route.
pub const EVENT_LINK_FALLBACK: &str = "deep_link_fallback";
/// Emitted when a shared workout link is opened.
pub const EVENT_SHARED_WORKOUT_OPENED: &str = "shared_workout_opened";
/// Emitted when a campaign or promo link is attributed.
pub const EVENT_CAMPAIGN_ATTRIBUTED: &str = "campaign_attributed";

/// Destination for analytics events.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: &str, properties: &Params);
}

/// Sink that writes events to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn record(&self, event: &str, properties: &Params) {
        metrics::record_analytics_event(event);
        tracing::info!(event = %event, properties = ?properties, "Analytics event");
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, Params)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, Params)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Names of recorded events, in order.
    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|(name, _)| name).collect()
    }
}

impl AnalyticsSink for RecordingSink {
    fn record(&self, event: &str, properties: &Params) {
        if let Ok(mut events) = self.events.lock() {
            events.push((event.to_string(), properties.clone()));
        }
    }
}
