//! `/api/*` handlers.
//!
//! Handlers decode the body, hand it to the relay, and turn whatever comes
//! back into a response. Every failure is answered with a JSON object.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::{ClientHints, RelayError, RelayRequest, UpstreamReply, UpstreamTransport};

/// Client-facing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Config,
    Hzkc,
    Kxkc,
    Search,
    Add,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Config => "config",
            Operation::Hzkc => "hzkc",
            Operation::Kxkc => "kxkc",
            Operation::Search => "search",
            Operation::Add => "add",
        }
    }
}

pub async fn api_config<T: UpstreamTransport>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    dispatch(&state, Operation::Config, &headers, body).await
}

pub async fn api_hzkc<T: UpstreamTransport>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    dispatch(&state, Operation::Hzkc, &headers, body).await
}

pub async fn api_kxkc<T: UpstreamTransport>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    dispatch(&state, Operation::Kxkc, &headers, body).await
}

pub async fn api_search<T: UpstreamTransport>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    dispatch(&state, Operation::Search, &headers, body).await
}

pub async fn api_add<T: UpstreamTransport>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    dispatch(&state, Operation::Add, &headers, body).await
}

/// Liveness probe.
pub async fn healthz() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn dispatch<T: UpstreamTransport>(
    state: &AppState<T>,
    op: Operation,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(headers);

    tracing::debug!(request_id = %request_id, operation = op.as_str(), "Relaying request");

    let result = match decode(body) {
        Ok(request) => {
            let hints = ClientHints::from_headers(headers);
            let call = relay_call(state, op, &hints, &request);
            match state.request_timeout {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .unwrap_or(Err(RelayError::Timeout(limit.as_secs()))),
                None => call.await,
            }
        }
        Err(e) => Err(e),
    };

    let response = match result {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                operation = op.as_str(),
                error_code = e.error_code(),
                error = %e,
                "Relay request failed"
            );
            e.into_response()
        }
    };

    metrics::record_request(op.as_str(), response.status().as_u16(), start);
    response
}

fn decode(body: Result<Bytes, BytesRejection>) -> Result<RelayRequest, RelayError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::PayloadTooLarge(rejection.body_text())
        } else {
            RelayError::InvalidRequest(rejection.body_text())
        }
    })?;
    serde_json::from_slice(&body).map_err(|e| RelayError::InvalidRequest(e.to_string()))
}

async fn relay_call<T: UpstreamTransport>(
    state: &AppState<T>,
    op: Operation,
    hints: &ClientHints,
    request: &RelayRequest,
) -> Result<UpstreamReply, RelayError> {
    let relay = &state.relay;
    match op {
        Operation::Config => relay.config(hints, request).await,
        Operation::Hzkc => relay.hzkc(hints, request).await,
        Operation::Kxkc => relay.kxkc(hints, request).await,
        Operation::Search => relay.search(hints, request).await,
        Operation::Add => relay.add(hints, request).await,
    }
}
