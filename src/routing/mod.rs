//! Routing module
//!
//! Resolves request paths to storage keys:
//! - Manual routes from a table built at startup
//! - Fixed extension fallbacks tried for every path

mod candidates;
mod table;

pub use candidates::{resolve_candidates, short_path, FALLBACK_EXTENSIONS};
pub use table::{overridden_paths, RouteTable};
