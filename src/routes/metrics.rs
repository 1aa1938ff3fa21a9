//! Prometheus metrics endpoint
//!
//! Exposes gateway and upstream metrics in Prometheus format.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::warn;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    let handle = PROMETHEUS_HANDLE.get_or_try_init(|| PrometheusBuilder::new().install_recorder());
    if let Err(e) = handle {
        warn!(error = %e, "Failed to install Prometheus recorder, metrics disabled");
        return;
    }

    register_metrics();
}

/// Describe all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "gateway_requests_total",
        "Total number of gateway requests by endpoint and outcome"
    );
    metrics::describe_counter!(
        "gateway_upstream_errors_total",
        "Total number of failed upstream completions by error kind"
    );
    metrics::describe_histogram!(
        "gateway_upstream_duration_seconds",
        "Upstream completion duration in seconds"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns an empty body when the recorder was never installed.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_default()
}

/// Record a handled gateway request
pub fn record_request(endpoint: &'static str, outcome: &'static str) {
    metrics::counter!("gateway_requests_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
}

/// Record one upstream completion
pub fn record_upstream_call(operation: &'static str, model: &str, outcome: &'static str, duration_secs: f64) {
    metrics::histogram!(
        "gateway_upstream_duration_seconds",
        "operation" => operation,
        "model" => model.to_string()
    )
    .record(duration_secs);

    if outcome != "success" {
        metrics::counter!("gateway_upstream_errors_total", "kind" => outcome).increment(1);
    }
}
