//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, one span per incoming link)
//!     → metrics.rs (counters through the `metrics` facade)
//!
//! Consumers:
//!     → tracing-subscriber fmt layer (stderr)
//!     → whatever metrics recorder the host app installs
//! ```
//!
//! # Design Decisions
//! - Structured fields, never interpolated strings, for link decisions
//! - Every link gets a v4 UUID so buffered replays can be correlated
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
