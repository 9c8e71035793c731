//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_requests_total` (counter): requests by method, status
//! - `site_request_duration_seconds` (histogram): latency distribution
//! - `site_locale_redirects_total` (counter): requests sent to a locale prefix
//! - `site_profile_variant_total` (counter): artist profiles served by variant
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter runs on its own listener, off the public router

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::ProfileVariant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "site_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("site_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_redirect() {
    metrics::counter!("site_locale_redirects_total").increment(1);
}

pub fn record_profile_variant(variant: ProfileVariant) {
    metrics::counter!("site_profile_variant_total", "variant" => variant.as_str()).increment(1);
}

/// Middleware recording count and latency of every response.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
