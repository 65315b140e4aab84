//! The relay operations.
//!
//! Each simple operation makes exactly one upstream call. `search` chains
//! `hzkc` and `kxkc`: the first answer is scanned for a `kcptdm`, which keys
//! the second call. Nothing is retried and nothing is kept between requests.

use std::time::Instant;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::relay::error::RelayError;
use crate::relay::form::{encode_pairs, encode_payload, Payload};
use crate::relay::headers::{build_headers, ClientHints, UpstreamHeaders};
use crate::relay::kcptdm::{find_kcptdm, KCPTDM};
use crate::relay::paths::{path_for, Endpoint};
use crate::relay::reply::{truncate_text, UpstreamReply};
use crate::relay::transport::{UpstreamRequest, UpstreamResponse, UpstreamTransport};

/// Inbound body shared by every `/api/*` operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayRequest {
    /// Session cookie, forwarded verbatim.
    #[serde(default)]
    pub cookie: Option<String>,

    /// Form fields for the upstream. `null` is treated as empty.
    #[serde(default)]
    pub payload: Option<Payload>,

    /// Course-selection category; a string or a number.
    #[serde(default)]
    pub xklx: Option<Value>,
}

impl RelayRequest {
    /// Category as text. Absent or `null` yields `default`.
    pub fn category(&self, default: &str) -> String {
        match &self.xklx {
            None | Some(Value::Null) => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref().filter(|c| !c.is_empty())
    }
}

/// Per-request values shared by every upstream call of one operation.
struct CallContext {
    headers: UpstreamHeaders,
    xklx: String,
}

/// Upstream relay over any [`UpstreamTransport`].
pub struct Relay<T> {
    transport: T,
    upstream: UpstreamConfig,
}

impl<T: UpstreamTransport> Relay<T> {
    pub fn new(transport: T, upstream: UpstreamConfig) -> Self {
        Self {
            transport,
            upstream,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn upstream(&self) -> &UpstreamConfig {
        &self.upstream
    }

    /// Selection round configuration. Sends an empty body.
    pub async fn config(
        &self,
        hints: &ClientHints,
        request: &RelayRequest,
    ) -> Result<UpstreamReply, RelayError> {
        let ctx = self.prepare(hints, request)?;
        let response = self.call(&ctx, Endpoint::Config, String::new()).await?;
        Ok(UpstreamReply::from_response(response))
    }

    /// Course group search.
    pub async fn hzkc(
        &self,
        hints: &ClientHints,
        request: &RelayRequest,
    ) -> Result<UpstreamReply, RelayError> {
        self.forward(hints, request, Endpoint::Hzkc).await
    }

    /// Seat-level detail for one course group.
    pub async fn kxkc(
        &self,
        hints: &ClientHints,
        request: &RelayRequest,
    ) -> Result<UpstreamReply, RelayError> {
        self.forward(hints, request, Endpoint::Kxkc).await
    }

    /// Registration. A JSON object whose `code` is present and not zero is
    /// returned as [`RelayError::Business`] with the body untouched.
    pub async fn add(
        &self,
        hints: &ClientHints,
        request: &RelayRequest,
    ) -> Result<UpstreamReply, RelayError> {
        let reply = self.forward(hints, request, Endpoint::Add).await?;

        if let UpstreamReply::Json { body, .. } = &reply {
            if let Some(code) = body.as_object().and_then(|o| o.get("code")) {
                if !is_zero(code) {
                    tracing::info!(code = %code, "Upstream rejected registration");
                    return Err(RelayError::Business(body.clone()));
                }
            }
        }

        Ok(reply)
    }

    /// Group search followed by seat lookup, as one call.
    pub async fn search(
        &self,
        hints: &ClientHints,
        request: &RelayRequest,
    ) -> Result<UpstreamReply, RelayError> {
        let ctx = self.prepare(hints, request)?;
        let empty = Payload::new();
        let payload = request.payload.as_ref().unwrap_or(&empty);

        let first = self
            .call(&ctx, Endpoint::Hzkc, encode_payload(payload))
            .await?;
        let groups: Value = match serde_json::from_str(&first.body) {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(status = %first.status, "Group search did not return JSON");
                return Err(RelayError::InvalidHzkcResponse {
                    status: first.status.as_u16(),
                    text: truncate_text(&first.body),
                });
            }
        };

        let kcptdm = match find_kcptdm(&groups, self.upstream.max_search_depth) {
            Some(k) => k,
            None => {
                tracing::warn!("No kcptdm in group search response");
                return Err(RelayError::KcptdmNotFound { upstream: groups });
            }
        };
        tracing::debug!(kcptdm = %kcptdm, "Resolved course group");

        let detail = detail_payload(&kcptdm, payload);
        let body = encode_pairs(detail.iter().map(|(k, v)| (*k, v)));
        let second = self.call(&ctx, Endpoint::Kxkc, body).await?;

        Ok(UpstreamReply::from_response(second))
    }

    async fn forward(
        &self,
        hints: &ClientHints,
        request: &RelayRequest,
        endpoint: Endpoint,
    ) -> Result<UpstreamReply, RelayError> {
        let ctx = self.prepare(hints, request)?;
        let body = request
            .payload
            .as_ref()
            .map(encode_payload)
            .unwrap_or_default();
        let response = self.call(&ctx, endpoint, body).await?;
        Ok(UpstreamReply::from_response(response))
    }

    fn prepare(
        &self,
        hints: &ClientHints,
        request: &RelayRequest,
    ) -> Result<CallContext, RelayError> {
        let cookie = request.cookie().ok_or(RelayError::CredentialRequired)?;
        let xklx = request.category(&self.upstream.default_xklx);
        let headers = build_headers(hints, Some(cookie), &xklx, &self.upstream);
        Ok(CallContext { headers, xklx })
    }

    async fn call(
        &self,
        ctx: &CallContext,
        endpoint: Endpoint,
        body: String,
    ) -> Result<UpstreamResponse, RelayError> {
        let xklx = if ctx.xklx.is_empty() {
            self.upstream.default_xklx.as_str()
        } else {
            ctx.xklx.as_str()
        };
        let request = UpstreamRequest {
            endpoint,
            path: path_for(Some(xklx), endpoint),
            headers: ctx.headers.clone(),
            body,
        };

        let start = Instant::now();
        match self.transport.send(request).await {
            Ok(response) => {
                tracing::debug!(
                    endpoint = %endpoint,
                    xklx = %ctx.xklx,
                    status = %response.status,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream call completed"
                );
                metrics::record_upstream_call(endpoint.as_str(), "ok", start);
                Ok(response)
            }
            Err(e) => {
                tracing::error!(endpoint = %endpoint, xklx = %ctx.xklx, error = %e, "Upstream call failed");
                metrics::record_upstream_call(endpoint.as_str(), "error", start);
                Err(e)
            }
        }
    }
}

/// Second-step payload: the resolved group plus paging copied from the caller.
fn detail_payload(kcptdm: &str, original: &Payload) -> Vec<(&'static str, Value)> {
    let copy = |key: &str, default: Value| original.get(key).cloned().unwrap_or(default);
    vec![
        (KCPTDM, Value::String(kcptdm.to_string())),
        ("page", copy("page", json!(1))),
        ("rows", copy("rows", json!(50))),
        ("sort", copy("sort", json!("kcrwdm"))),
        ("order", copy("order", json!("asc"))),
    ]
}

/// `0`, `0.0` and `false` count as success.
fn is_zero(code: &Value) -> bool {
    match code {
        Value::Bool(b) => !b,
        other => other.as_f64() == Some(0.0),
    }
}
