//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_exchanges_total` (counter): exchanges by outcome
//! - `gateway_exchange_duration_seconds` (histogram): token endpoint latency by outcome
//! - `gateway_exchange_bypass_total` (counter): requests let through without an exchange
//! - `gateway_upstream_requests_total` (counter): forwarded requests by method, status
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_exchange(outcome: &'static str, start: Instant) {
    counter!("gateway_exchanges_total", "outcome" => outcome).increment(1);
    histogram!("gateway_exchange_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_bypass(reason: &'static str) {
    counter!("gateway_exchange_bypass_total", "reason" => reason).increment(1);
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_upstream_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}
