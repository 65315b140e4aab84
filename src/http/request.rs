//! Request ID handling.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A caller-supplied `x-request-id` is kept; otherwise a UUID v4 is minted
//! - The ID is echoed on the response

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Mints UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

pub fn set_request_id_layer() -> SetRequestIdLayer<UuidRequestId> {
    SetRequestIdLayer::x_request_id(UuidRequestId)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// The request ID of an inbound request, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_minted_ids_are_uuids() {
        let req = Request::new(Body::empty());
        let id = UuidRequestId.make_request_id(&req).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }

    #[test]
    fn test_request_id_lookup() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));
        assert_eq!(request_id(&headers), "abc");
    }
}
