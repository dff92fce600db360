//! Link decomposition and generation.
//!
//! # Data Flow
//! ```text
//! Incoming URI (app-scheme or universal link)
//!     → parser.rs (scheme/host/path/query decomposition)
//!     → ParsedLink { original_url, hostname, path, params }
//!     → routing registry
//!
//! Share request (kind, id, params)
//!     → generator.rs (canonical https link + source marker)
//!     → String handed to the OS share sheet
//! ```
//!
//! # Design Decisions
//! - Parsing never panics; malformed input is a typed `ParseError`
//! - `path` always starts with `/`
//! - Duplicate query keys: last occurrence wins
//! - Generated links must parse back to a route in the registered table

pub mod generator;
pub mod parser;

use std::collections::BTreeMap;

/// Query or route parameters, ordered for stable output.
pub type Params = BTreeMap<String, String>;

pub use generator::LinkGenerator;
pub use parser::{parse_url, ParseError, ParsedLink};
