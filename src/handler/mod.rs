//! Request handler module
//!
//! Responsible for request dispatch and image lookup.

pub mod images;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
