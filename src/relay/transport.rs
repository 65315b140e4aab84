//! Outbound transport to the upstream service.
//!
//! # Design Decisions
//! - The relay only depends on [`UpstreamTransport`], so tests swap in an
//!   in-memory transport and count calls
//! - One pooled `reqwest::Client` per process
//! - No retries; a failed round-trip surfaces as [`RelayError::Transport`]

use std::future::Future;
use std::time::Duration;

use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::relay::error::RelayError;
use crate::relay::headers::UpstreamHeaders;
use crate::relay::paths::Endpoint;

/// A fully prepared upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub endpoint: Endpoint,
    /// Path below the upstream base, e.g. `/new/student/xsxk/xklx/07/hzkc`.
    pub path: String,
    pub headers: UpstreamHeaders,
    /// Form-encoded body; empty for `config`.
    pub body: String,
}

/// Raw upstream answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            body: body.into(),
        }
    }
}

/// Something that can carry a POST to the upstream and bring back its answer.
pub trait UpstreamTransport: Send + Sync + 'static {
    fn send(
        &self,
        request: UpstreamRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, RelayError>> + Send;
}

/// HTTP transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build the client. Zero timeouts leave reqwest's defaults in place.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        // Connection is a hop-by-hop header and is rejected over h2.
        let mut builder = reqwest::Client::builder().http1_only();
        if timeouts.upstream_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeouts.upstream_secs));
        }
        if timeouts.connect_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(timeouts.connect_secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: upstream.base().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn to_header_map(headers: &UpstreamHeaders) -> Result<HeaderMap, RelayError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RelayError::Transport(format!("invalid header name {}", name)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| RelayError::Transport(format!("invalid value for header {}", name)))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

impl UpstreamTransport for HttpTransport {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, RelayError> {
        let url = format!("{}{}", self.base_url, request.path);
        let headers = to_header_map(&request.headers)?;

        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        Ok(UpstreamResponse { status, body })
    }
}
