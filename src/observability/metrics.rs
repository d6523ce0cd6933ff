//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dashboard_loads_total` (counter): load attempts by outcome
//! - `dashboard_load_duration_seconds` (histogram): time per load attempt
//! - `dashboard_snapshot_countries` (gauge): countries in the current snapshot
//! - `dashboard_requests_total` (counter): API requests by route, status
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished load attempt. `outcome` is `success` or an error kind.
pub fn record_load(outcome: &'static str, started: Instant) {
    metrics::counter!("dashboard_loads_total", "outcome" => outcome).increment(1);
    metrics::histogram!("dashboard_load_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_snapshot_size(countries: usize) {
    metrics::gauge!("dashboard_snapshot_countries").set(countries as f64);
}

pub fn record_request(route: &str, status: u16) {
    metrics::counter!(
        "dashboard_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
