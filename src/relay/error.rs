//! Relay error taxonomy.

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors that can occur while relaying a request.
///
/// Every variant is turned into a JSON response at the handler boundary.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller sent no session cookie.
    #[error("cookie_required")]
    CredentialRequired,

    /// The inbound body was not a relay request.
    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    /// The inbound body exceeded `listener.max_body_size`.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// The whole operation outlived `timeouts.request_secs`.
    #[error("upstream_timeout after {0}s")]
    Timeout(u64),

    /// The upstream could not be reached.
    #[error("{0}")]
    Transport(String),

    /// The group search answered with something other than JSON.
    #[error("invalid_hzkc_response (upstream status {status})")]
    InvalidHzkcResponse { status: u16, text: String },

    /// The group search answered, but carried no usable `kcptdm`.
    #[error("kcptdm_not_found")]
    KcptdmNotFound { upstream: Value },

    /// The upstream refused a registration; carries its JSON unchanged.
    #[error("upstream rejected the request")]
    Business(Value),
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Transport(e.to_string())
    }
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::CredentialRequired | RelayError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::InvalidHzkcResponse { .. } | RelayError::KcptdmNotFound { .. } => {
                StatusCode::BAD_GATEWAY
            }
            RelayError::Business(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Short machine-readable label, used for metrics and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            RelayError::CredentialRequired => "cookie_required",
            RelayError::InvalidRequest(_) => "invalid_request",
            RelayError::PayloadTooLarge(_) => "payload_too_large",
            RelayError::Timeout(_) => "upstream_timeout",
            RelayError::Transport(_) => "transport",
            RelayError::InvalidHzkcResponse { .. } => "invalid_hzkc_response",
            RelayError::KcptdmNotFound { .. } => "kcptdm_not_found",
            RelayError::Business(_) => "business",
        }
    }

    /// JSON body returned to the caller.
    pub fn into_body(self) -> Value {
        match self {
            RelayError::CredentialRequired => json!({"error": "cookie_required"}),
            RelayError::InvalidRequest(detail) => {
                json!({"error": "invalid_request", "detail": detail})
            }
            RelayError::PayloadTooLarge(detail) => {
                json!({"error": "payload_too_large", "detail": detail})
            }
            RelayError::Timeout(secs) => {
                json!({"error": "upstream_timeout", "timeout_secs": secs})
            }
            RelayError::Transport(cause) => json!({"error": cause}),
            RelayError::InvalidHzkcResponse { status, text } => json!({
                "error": "invalid_hzkc_response",
                "status": status,
                "text": text,
            }),
            RelayError::KcptdmNotFound { upstream } => json!({
                "error": "kcptdm_not_found",
                "upstream": upstream,
            }),
            RelayError::Business(body) => body,
        }
    }
}
