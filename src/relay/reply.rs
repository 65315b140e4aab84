//! Classification of upstream answers.

use axum::http::StatusCode;
use serde_json::Value;

use crate::relay::transport::UpstreamResponse;

/// Longest prefix of a non-JSON body echoed back in diagnostics.
pub const DIAGNOSTIC_TEXT_CHARS: usize = 500;

/// What the relay hands back to the caller for a successful round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamReply {
    /// Body decoded as JSON.
    Json { status: StatusCode, body: Value },
    /// Body did not decode; passed through with the upstream status.
    Text { status: StatusCode, body: String },
}

impl UpstreamReply {
    /// JSON bodies are normalized to 200; anything else keeps its status.
    pub fn from_response(response: UpstreamResponse) -> Self {
        match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => UpstreamReply::Json {
                status: StatusCode::OK,
                body,
            },
            Err(_) => UpstreamReply::Text {
                status: response.status,
                body: response.body,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamReply::Json { status, .. } | UpstreamReply::Text { status, .. } => *status,
        }
    }
}

/// First [`DIAGNOSTIC_TEXT_CHARS`] characters of `text`.
pub fn truncate_text(text: &str) -> String {
    text.chars().take(DIAGNOSTIC_TEXT_CHARS).collect()
}
