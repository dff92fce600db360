//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     (pattern, handler)[] in registration order
//!     → pattern.rs (tokenize `:name` / `*`)
//!     → registry.rs (exact map + ordered dynamic list)
//!
//! Resolution (per link):
//!     ParsedLink.path
//!     → exact lookup (static patterns, O(1))
//!     → first dynamic pattern in registration order that accepts the path
//!     → Return: RouteMatch or None
//! ```
//!
//! # Design Decisions
//! - Static patterns always win over dynamic ones
//! - Registration order is the only tie-break between dynamic patterns;
//!   register most-specific first
//! - No regex: patterns compile to literal/param/wildcard tokens
//! - Deterministic: same path always resolves to the same handler

pub mod pattern;
pub mod registry;

pub use pattern::RoutePattern;
pub use registry::{RouteMatch, RouteRegistry};
