//! Response mapping.
//!
//! # Design Decisions
//! - Upstream JSON goes back as JSON; anything else as `text/html` with the
//!   upstream status
//! - Every relay error becomes a JSON object

use axum::{
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::relay::{RelayError, UpstreamReply};

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        match self {
            UpstreamReply::Json { status, body } => (status, Json(body)).into_response(),
            UpstreamReply::Text { status, body } => (status, Html(body)).into_response(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.into_body())).into_response()
    }
}
