//! HTTP protocol layer module
//!
//! Provides body types, MIME detection and response builders, decoupled
//! from routing and storage.

pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use response::{
    build_404_response, build_405_response, build_500_response, build_health_response,
    build_image_response, build_options_response, DEFAULT_CONTENT_TYPE, NOT_FOUND_MESSAGE,
};
