//! Authentication gate subsystem.
//!
//! # Data Flow
//! ```text
//! handler for a protected screen
//!     → AuthOracle::is_authenticated()
//!     → yes: navigate(screen, params)
//!     → no:  persist PendingNavigation (single slot, overwrite)
//!            → navigate(login_screen, original query params)
//!
//! after sign-in (explicit resume call)
//!     → load PendingNavigation
//!     → absent: no-op | expired: delete, no-op | live: navigate, delete
//! ```
//!
//! # Design Decisions
//! - One pending record at a time; the newest protected link wins
//! - Expiry is checked lazily at consumption time, never with timers
//! - Storage failures degrade to "no pending navigation"

pub mod gate;

use std::sync::atomic::{AtomicBool, Ordering};

pub use gate::{AuthGate, GateOutcome, PendingNavigation, ResumeOutcome};

/// Source of truth for whether a user is signed in.
pub trait AuthOracle: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// Oracle backed by a switchable flag.
#[derive(Debug, Default)]
pub struct StaticAuth {
    authenticated: AtomicBool,
}

impl StaticAuth {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated: AtomicBool::new(authenticated),
        }
    }

    pub fn set(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }
}

impl AuthOracle for StaticAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}
