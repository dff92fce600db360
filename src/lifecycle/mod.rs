//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     DeepLinkConfig + Collaborators → DispatchCoordinator → launch URI
//!
//! Event loop (event_loop.rs):
//!     mpsc<LinkEvent> → one event at a time → coordinator
//!
//! Shutdown (shutdown.rs):
//!     trigger() → event loop stops after the event in progress
//! ```
//!
//! # Design Decisions
//! - The coordinator is built once and owned by exactly one task
//! - Events are never processed concurrently; an in-flight dispatch always
//!   finishes before shutdown is observed

pub mod event_loop;
pub mod shutdown;
pub mod startup;

pub use event_loop::{run_event_loop, LinkEvent};
pub use shutdown::Shutdown;
pub use startup::bootstrap;
