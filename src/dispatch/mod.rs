//! Link dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! raw URI
//!     → link::parse_url ── failure → Dropped (silent)
//!     → attribution referral side effect
//!     → state == Uninitialized ?
//!          yes → pending.rs slot (newest wins) → replay on ready signal
//!          no  → registry.resolve(path)
//!                  → handler ── error → fallback
//!                  → none             → fallback (reset to home + event)
//! ```
//!
//! # State Machine
//! ```text
//! Uninitialized ──ready signal (drain slot)──▶ Ready (terminal)
//! ```
//!
//! # Design Decisions
//! - One link is processed to completion before the next (`&mut self`)
//! - At most one buffered link; a newer one overwrites the older
//! - No error escapes dispatch; every failure degrades to the home route

pub mod coordinator;
pub mod pending;

pub use coordinator::{
    Collaborators, DispatchCoordinator, DispatchOutcome, DispatchState, FallbackReason,
};
pub use pending::PendingLinkSlot;
