//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by action, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency by action
//! - `gateway_upstream_calls_total` (counter): outbound calls by endpoint, outcome
//! - `gateway_upstream_duration_seconds` (histogram): outbound latency by endpoint
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one inbound gateway request.
pub fn record_request(action: &'static str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "action" => action,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "action" => action)
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound reseller API call.
pub fn record_upstream_call(endpoint: &'static str, outcome: &'static str, start: Instant) {
    counter!(
        "gateway_upstream_calls_total",
        "endpoint" => endpoint,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("gateway_upstream_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}
