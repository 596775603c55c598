//! Metrics collection and exposition.
//!
//! # Metrics
//! - `asset_host_requests_total` (counter): requests by method, status
//! - `asset_host_request_duration_seconds` (histogram): latency distribution
//! - `asset_host_auth_checks_total` (counter): gate decisions by outcome
//! - `asset_host_registrations_total` (counter): registrations by kind, outcome
//! - `asset_host_registered` (gauge): registry sizes by kind
//!
//! Recording is a no-op until a recorder is installed, so tests need no setup.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    counter!("asset_host_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    histogram!("asset_host_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_auth_check(outcome: &'static str) {
    counter!("asset_host_auth_checks_total", "outcome" => outcome).increment(1);
}

pub fn record_registration(kind: &'static str, outcome: &'static str) {
    counter!("asset_host_registrations_total", "kind" => kind, "outcome" => outcome)
        .increment(1);
}

pub fn record_registry_sizes(resources: usize, handlers: usize) {
    gauge!("asset_host_registered", "kind" => "resource").set(resources as f64);
    gauge!("asset_host_registered", "kind" => "post").set(handlers as f64);
}
