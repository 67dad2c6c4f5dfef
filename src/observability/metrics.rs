//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_submissions_total` (counter): submissions by outcome
//! - `gateway_ledger_connected` (gauge): 1=reachable, 0=unreachable
//!
//! # Design Decisions
//! - Prometheus exporter runs on its own listener, separate from the
//!   service port
//! - Route labels use the matched route template, never raw paths, to
//!   keep cardinality bounded

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on its own listener.
///
/// Exporter failure is logged, not fatal: the gateway still serves
/// traffic without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("gateway_requests_total", &labels).increment(1);
    histogram!("gateway_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a submission that reached the pipeline's
/// final stages ("confirmed", "reverted", "timeout").
pub fn record_submission(outcome: &str) {
    counter!("gateway_submissions_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record ledger node reachability as observed by the liveness probe.
pub fn record_ledger_health(connected: bool) {
    gauge!("gateway_ledger_connected").set(if connected { 1.0 } else { 0.0 });
}
