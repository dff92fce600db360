//! Metrics collection.
//!
//! # Metrics
//! - `deeplink_received_total` (counter): raw links delivered
//! - `deeplink_dispatch_total` (counter): dispatch results by outcome
//! - `deeplink_pending_overwrite_total` (counter): buffered links replaced
//!   before the navigator became ready
//! - `deeplink_resume_total` (counter): resume checks by outcome
//! - `deeplink_storage_errors_total` (counter): swallowed storage failures by op
//! - `deeplink_analytics_events_total` (counter): analytics events by name

use metrics::counter;

pub fn record_received() {
    counter!("deeplink_received_total").increment(1);
}

pub fn record_dispatch(outcome: &'static str) {
    counter!("deeplink_dispatch_total", "outcome" => outcome).increment(1);
}

pub fn record_pending_overwrite() {
    counter!("deeplink_pending_overwrite_total").increment(1);
}

pub fn record_resume(outcome: &'static str) {
    counter!("deeplink_resume_total", "outcome" => outcome).increment(1);
}

pub fn record_storage_error(op: &'static str) {
    counter!("deeplink_storage_errors_total", "op" => op).increment(1);
}

pub fn record_analytics_event(event: &str) {
    counter!("deeplink_analytics_events_total", "event" => event.to_string()).increment(1);
}
