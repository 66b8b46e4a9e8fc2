//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): completed relays by route, status
//! - `relay_request_duration_seconds` (histogram): upstream round-trip latency
//! - `relay_upstream_errors_total` (counter): failed relays by route, error kind
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_relay(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!("relay_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(route: &'static str, kind: &'static str) {
    metrics::counter!("relay_upstream_errors_total", "route" => route, "kind" => kind).increment(1);
}
