//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, health probes
//! and image lookup.

use crate::config::AppState;
use crate::handler::images;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use crate::routing;
use hyper::body::Body as _;
use hyper::header::{CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{HeaderMap, Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// The request body is never read. Store failures are logged and turned
/// into a 500 so the connection stays usable.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let (response, object_key) = route_request(&req, &state).await;

    if state.config.logging.access_log {
        let entry = access_entry(&req, peer_addr, &response, object_key, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request<B>(
    req: &Request<B>,
    state: &AppState,
) -> (Response<ResponseBody>, Option<String>) {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        return (resp, None);
    }

    // 2. Health check endpoints
    let health = &state.config.routes.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return (http::build_health_response("ok"), None);
    }

    // 3. Image lookup
    let short = routing::short_path(path);
    match images::serve_image(short, &state.routes, state.store.as_ref(), is_head).await {
        Ok(result) => result,
        Err(e) => {
            logger::log_error(&format!(
                "Store '{}' failed while serving {path}: {e}",
                state.store.name()
            ));
            (http::build_500_response(is_head), None)
        }
    }
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn access_entry<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &Response<ResponseBody>,
    object_key: Option<String>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = if *req.method() == Method::HEAD {
        0
    } else {
        header_str(response.headers(), CONTENT_LENGTH.as_str())
            .and_then(|v| v.parse().ok())
            .or_else(|| response.body().size_hint().exact())
            .unwrap_or(0)
    };
    entry.object_key = object_key;
    entry.referer = header_str(req.headers(), REFERER.as_str()).map(ToString::to_string);
    entry.user_agent = header_str(req.headers(), USER_AGENT.as_str()).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::{
        DirectoryStore, ImageStore, MemoryStore, StoreError, StoreResult, StoredObject,
    };
    use async_trait::async_trait;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::header::{ALLOW, CONTENT_TYPE};
    use hyper::StatusCode;

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.logging.access_log = false;
        config
    }

    fn state_with(store: MemoryStore) -> Arc<AppState> {
        Arc::new(AppState::new(&quiet_config(), Arc::new(store)))
    }

    fn request(method: Method, uri: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Empty::new())
            .unwrap()
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> Response<ResponseBody> {
        handle_request(request(method, uri), Arc::clone(state), peer())
            .await
            .unwrap()
    }

    async fn body_string(resp: Response<ResponseBody>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_routed_image() {
        let store = MemoryStore::new();
        store.insert("genius.jpg", b"genius".to_vec(), Some("image/jpeg"));
        let state = state_with(store);

        let resp = send(&state, Method::GET, "/genius").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "6");
        assert_eq!(body_string(resp).await, "genius");
    }

    #[tokio::test]
    async fn test_query_string_is_ignored() {
        let store = MemoryStore::new();
        store.insert("cat.gif", b"gif".to_vec(), Some("image/gif"));
        let state = state_with(store);

        let resp = send(&state, Method::GET, "/cat?size=large").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "image/gif");
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let state = state_with(MemoryStore::new());

        let resp = send(&state, Method::GET, "/missing").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, http::NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_root_path_is_not_found() {
        let state = state_with(MemoryStore::new());
        let resp = send(&state, Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_overlong_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path());
        let state = Arc::new(AppState::new(&quiet_config(), Arc::new(store)));

        let uri = format!("/{}", "a".repeat(300));
        let resp = send(&state, Method::GET, &uri).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, http::NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_head_request() {
        let store = MemoryStore::new();
        store.insert("tool.gif", vec![0u8; 32], Some("image/gif"));
        let state = state_with(store);

        let resp = send(&state, Method::HEAD, "/tool").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "32");
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let state = state_with(MemoryStore::new());

        let resp = send(&state, Method::POST, "/muppet").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn test_options() {
        let state = state_with(MemoryStore::new());
        let resp = send(&state, Method::OPTIONS, "/muppet").await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let state = state_with(MemoryStore::new());

        for path in ["/healthz", "/readyz"] {
            let resp = send(&state, Method::GET, path).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(body_string(resp).await, "ok");
        }
    }

    #[tokio::test]
    async fn test_health_disabled_falls_through_to_lookup() {
        let mut config = quiet_config();
        config.routes.health.enabled = false;
        let store = MemoryStore::new();
        store.insert("healthz.png", b"png".to_vec(), Some("image/png"));
        let state = Arc::new(AppState::new(&config, Arc::new(store)));

        let resp = send(&state, Method::GET, "/healthz").await;
        assert_eq!(resp.headers()[CONTENT_TYPE], "image/png");
    }

    struct BrokenStore;

    #[async_trait]
    impl ImageStore for BrokenStore {
        async fn get(&self, _key: &str) -> StoreResult<Option<StoredObject>> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let state = Arc::new(AppState::new(&quiet_config(), Arc::new(BrokenStore)));

        let resp = send(&state, Method::GET, "/muppet").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .uri("/muppet?x=1")
            .header(USER_AGENT, "curl/8.0")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let resp = http::build_404_response(false);

        let entry = access_entry(&req, peer(), &resp, None, Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/muppet");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, http::NOT_FOUND_MESSAGE.len() as u64);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert!(entry.referer.is_none());
    }
}
