//! # Prometheus Metrics
//!
//! Operational metrics for the gateway, scraped at the `/metrics` endpoint
//! on the configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the gateway.
#[derive(Clone)]
pub struct GatewayMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Total REST requests handled, across every endpoint.
    pub http_requests_total: IntCounter,
    /// Requests that failed because the upstream node errored or the
    /// response did not parse.
    pub upstream_errors_total: IntCounter,
    /// Latency of handlers that reach out to the upstream node, in seconds.
    pub upstream_latency_seconds: Histogram,
}

impl GatewayMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("zenith".into()), None)
            .expect("failed to create prometheus registry");

        let http_requests_total = IntCounter::new(
            "http_requests_total",
            "Total REST requests handled by the gateway",
        )
        .expect("metric creation");
        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric registration");

        let upstream_errors_total = IntCounter::new(
            "upstream_errors_total",
            "Requests that failed due to an upstream RPC error",
        )
        .expect("metric creation");
        registry
            .register(Box::new(upstream_errors_total.clone()))
            .expect("metric registration");

        let upstream_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "upstream_latency_seconds",
                "Latency of handlers that query the upstream node, in seconds",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(upstream_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            http_requests_total,
            upstream_errors_total,
            upstream_latency_seconds,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("prometheus output is valid utf-8"))
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<GatewayMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails (should never happen in practice).
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_the_exposition() {
        let metrics = GatewayMetrics::new();
        metrics.http_requests_total.inc();
        metrics.upstream_errors_total.inc();

        let body = metrics.encode().unwrap();
        assert!(body.contains("zenith_http_requests_total 1"));
        assert!(body.contains("zenith_upstream_errors_total 1"));
    }

    #[test]
    fn histogram_registers_observations() {
        let metrics = GatewayMetrics::new();
        metrics.upstream_latency_seconds.observe(0.03);

        let body = metrics.encode().unwrap();
        assert!(body.contains("zenith_upstream_latency_seconds_count 1"));
    }
}
