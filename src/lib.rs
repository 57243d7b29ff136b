//! imgroute - short-URL image router
//!
//! Resolves request paths such as `/muppet` to stored image objects by
//! probing an ordered list of storage keys and streaming the first hit.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod store;
