//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<Option<PrometheusHandle>> = Lazy::new(|| {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "tanyakakgem_turns_total",
        "Total number of chat turns processed, by outcome"
    );
    metrics::describe_histogram!(
        "tanyakakgem_turn_duration_seconds",
        "Turn duration in seconds, including the model call"
    );
    metrics::describe_counter!(
        "tanyakakgem_advisories_total",
        "Guardrail advisories raised, by kind"
    );
    metrics::describe_counter!(
        "tanyakakgem_session_events_total",
        "Session lifecycle events"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

/// Record a completed turn
pub fn record_turn(outcome: &str, duration_secs: f64) {
    metrics::counter!("tanyakakgem_turns_total", "outcome" => outcome.to_string()).increment(1);
    metrics::histogram!("tanyakakgem_turn_duration_seconds", "outcome" => outcome.to_string())
        .record(duration_secs);
}

/// Record a guardrail advisory
pub fn record_advisory(kind: &str) {
    metrics::counter!("tanyakakgem_advisories_total", "kind" => kind.to_string()).increment(1);
}

/// Record a session lifecycle event (created, reset, credential_rotated, ended)
pub fn record_session_event(event: &str) {
    metrics::counter!("tanyakakgem_session_events_total", "event" => event.to_string())
        .increment(1);
}
