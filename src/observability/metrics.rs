//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by endpoint, status
//! - `relay_request_duration_seconds` (histogram): inbound latency by endpoint
//! - `relay_upstream_calls_total` (counter): upstream calls by endpoint, outcome
//! - `relay_upstream_duration_seconds` (histogram): upstream latency by endpoint

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one inbound `/api/*` request.
pub fn record_request(endpoint: &str, status: u16, start: Instant) {
    counter!(
        "relay_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("relay_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream round-trip.
pub fn record_upstream_call(endpoint: &str, outcome: &'static str, start: Instant) {
    counter!(
        "relay_upstream_calls_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("relay_upstream_duration_seconds", "endpoint" => endpoint.to_string())
        .record(start.elapsed().as_secs_f64());
}
