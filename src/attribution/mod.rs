//! Referral and campaign attribution.
//!
//! # Data Flow
//! ```text
//! every parsed link
//!     → ref / referrer query param present?
//!     → ReferralData persisted (last link wins)
//!
//! campaign / promo handlers
//!     → CampaignAttribution persisted before navigating
//! ```
//!
//! # Design Decisions
//! - Runs independently of routing outcome
//! - Best effort: persistence failures are logged and swallowed
//! - No expiry; records are overwritten, never queued

pub mod recorder;

pub use recorder::{AttributionRecorder, CampaignAttribution, ReferralData};
