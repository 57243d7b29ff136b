//! Candidate key resolution
//!
//! Turns a request path into the ordered list of storage keys to probe.

use super::table::RouteTable;

/// Extensions tried for every path, in probe order
pub const FALLBACK_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Strip a single leading `/` from a URI path
///
/// No other normalization: case, percent-encoding and trailing slashes are
/// left as the HTTP layer delivered them.
pub fn short_path(uri_path: &str) -> &str {
    uri_path.strip_prefix('/').unwrap_or(uri_path)
}

/// Ordered storage keys to probe for `path`
///
/// The routed key (if any) comes first, followed by `path.jpg`,
/// `path.jpeg`, `path.png` and `path.gif`. Duplicates are kept.
pub fn resolve_candidates(path: &str, table: &RouteTable) -> Vec<String> {
    let mut candidates = Vec::with_capacity(FALLBACK_EXTENSIONS.len() + 1);
    if let Some(key) = table.get(path) {
        candidates.push(key.to_string());
    }
    candidates.extend(FALLBACK_EXTENSIONS.iter().map(|ext| format!("{path}.{ext}")));
    candidates
}
