//! Request identification.
//!
//! # Responsibilities
//! - Name the request ID header shared by the set/propagate layers
//! - Build the per-request tracing span carrying that ID
//!
//! # Design Decisions
//! - Request ID added as early as possible (outermost layer) for tracing
//! - An ID supplied by the client is kept, not replaced

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// The request ID header value, if present and valid UTF-8.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}

/// Span factory for `TraceLayer::make_span_with`.
pub fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()).unwrap_or("unknown"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_lookup() {
        let request = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(request.headers()), Some("abc-123"));
        assert_eq!(request_id(&HeaderMap::new()), None);
    }
}
