//! Deep-link resolution and navigation routing engine.
//!
//! Turns an incoming URI (app-scheme or universal link) into an in-app
//! navigation, coordinating with an authentication gate, a buffer for links
//! that arrive before navigation is mounted, and a referral/attribution side
//! channel.

pub mod analytics;
pub mod attribution;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod lifecycle;
pub mod link;
pub mod navigation;
pub mod observability;
pub mod routing;
pub mod storage;

pub use config::DeepLinkConfig;
pub use dispatch::{Collaborators, DispatchCoordinator, DispatchOutcome};
pub use link::{parse_url, LinkGenerator, ParsedLink};
