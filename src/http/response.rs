//! HTTP response building module
//!
//! Provides builders for the responses the router can produce, decoupled
//! from lookup logic.

use hyper::header::{HeaderValue, ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};

use super::body::{self, ResponseBody};
use crate::store::StoredObject;

/// Body of the 404 sent when no candidate key exists
pub const NOT_FOUND_MESSAGE: &str = "No matching route or image could be found.";

/// Content type used when the stored object carries none
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 200 response streaming a stored object
///
/// `Content-Length` is the object's recorded size; the body is passed
/// through unmodified (empty for HEAD).
pub fn build_image_response(object: StoredObject, is_head: bool) -> Response<ResponseBody> {
    let content_type = object
        .content_type
        .as_deref()
        .and_then(|ct| {
            HeaderValue::from_str(ct)
                .map_err(|_| {
                    crate::logger::log_warning(&format!(
                        "Stored content type {ct:?} is not a valid header value, using {DEFAULT_CONTENT_TYPE}"
                    ));
                })
                .ok()
        })
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let size = object.size;

    let body = if is_head {
        body::empty()
    } else {
        body::stream(object.body)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, size.to_string())
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(body::empty())
        })
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<ResponseBody> {
    text_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, is_head)
}

/// Build 500 response for store failures
pub fn build_500_response(is_head: bool) -> Response<ResponseBody> {
    text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
        is_head,
    )
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(ALLOW, ALLOWED_METHODS)
        .body(body::full("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(body::full("405 Method Not Allowed"))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(body::empty()).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(body::empty())
    })
}

/// Build health check response
pub fn build_health_response(status: &'static str) -> Response<ResponseBody> {
    text_response(StatusCode::OK, status, false)
}

fn text_response(status: StatusCode, message: &'static str, is_head: bool) -> Response<ResponseBody> {
    let body = if is_head {
        body::empty()
    } else {
        body::full(message)
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(body::full(message))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use http_body_util::BodyExt;
    use hyper::body::Bytes;

    fn object(data: &'static [u8], content_type: Option<&str>) -> StoredObject {
        StoredObject::new(
            Box::pin(stream::iter([Ok::<_, std::io::Error>(Bytes::from_static(data))])),
            data.len() as u64,
            content_type.map(ToString::to_string),
        )
    }

    #[tokio::test]
    async fn test_image_response_headers() {
        let resp = build_image_response(object(b"12345678", Some("image/png")), false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "image/png");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "8");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"12345678");
    }

    #[tokio::test]
    async fn test_image_response_default_content_type() {
        let resp = build_image_response(object(b"ab", None), false);
        assert_eq!(resp.headers()[CONTENT_TYPE], DEFAULT_CONTENT_TYPE);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "2");
    }

    #[tokio::test]
    async fn test_image_response_invalid_content_type_falls_back() {
        let resp = build_image_response(object(b"abcd", Some("image/png\r\nX-Evil: 1")), false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], DEFAULT_CONTENT_TYPE);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "4");
        assert!(resp.headers().get("x-evil").is_none());

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"abcd");
    }

    #[tokio::test]
    async fn test_image_response_head_has_no_body() {
        let resp = build_image_response(object(b"abc", Some("image/gif")), true);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "3");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_404_response() {
        let resp = build_404_response(false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(CONTENT_LENGTH).is_none());
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], NOT_FOUND_MESSAGE.as_bytes());
    }

    #[test]
    fn test_options_response() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()[ALLOW], ALLOWED_METHODS);
        assert!(resp.headers().contains_key("Access-Control-Allow-Origin"));

        let resp = build_options_response(false);
        assert!(!resp.headers().contains_key("Access-Control-Allow-Origin"));
    }
}
