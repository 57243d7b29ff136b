//! Response body types
//!
//! Image bodies are streamed from the store, fixed messages are sent in one
//! frame. Both are erased into a single body type for the service.

use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};

use crate::store::ObjectStream;

/// Body type returned by every handler
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// Body holding a complete in-memory payload
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body with no content (HEAD, 204)
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body forwarding a store stream frame by frame
pub fn stream(body: ObjectStream) -> ResponseBody {
    StreamBody::new(body.map_ok(Frame::data)).boxed_unsync()
}
