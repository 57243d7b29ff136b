//! Image lookup handler
//!
//! Turns a short path into the first stored object among its candidate keys.

use hyper::Response;

use crate::http::{self, ResponseBody};
use crate::logger;
use crate::routing::{self, RouteTable};
use crate::store::{ImageStore, StoreResult, StoredObject};

/// Probe candidate keys in order and return the first object found.
///
/// Lookups are sequential: a key is only fetched once every earlier key has
/// come back absent. A store failure aborts the scan.
pub async fn fetch_first_match(
    candidates: &[String],
    store: &dyn ImageStore,
) -> StoreResult<Option<(String, StoredObject)>> {
    for key in candidates {
        let found = store.get(key).await?;
        logger::log_probe(key, found.is_some());
        if let Some(object) = found {
            return Ok(Some((key.clone(), object)));
        }
    }
    Ok(None)
}

/// Resolve and serve one short path.
///
/// Returns the response along with the key that was served, or `None`
/// for a 404.
pub async fn serve_image(
    path: &str,
    table: &RouteTable,
    store: &dyn ImageStore,
    is_head: bool,
) -> StoreResult<(Response<ResponseBody>, Option<String>)> {
    let candidates = routing::resolve_candidates(path, table);
    match fetch_first_match(&candidates, store).await? {
        Some((key, object)) => Ok((http::build_image_response(object, is_head), Some(key))),
        None => Ok((http::build_404_response(is_head), None)),
    }
}
