//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::MetricsSettings;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsSettings) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("figi_cache_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at /metrics");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    // Track 5xx errors separately
    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record the cache partition of one batch
pub fn record_batch(hits: usize, misses: usize, unresolved: usize) {
    counter!("figi_cache_batches_total").increment(1);
    counter!("figi_cache_hits_total").increment(hits as u64);
    counter!("figi_cache_misses_total").increment(misses as u64);

    if unresolved > 0 {
        counter!("figi_cache_unresolved_total").increment(unresolved as u64);
    }
}

/// Record one call to the mapping API
pub fn record_upstream_call(success: bool, jobs: usize, duration: Duration) {
    let labels = [("status", if success { "success" } else { "error" }.to_string())];

    counter!("figi_upstream_requests_total", &labels).increment(1);
    counter!("figi_upstream_jobs_total", &labels).increment(jobs as u64);
    histogram!("figi_upstream_request_duration_seconds", &labels).record(duration.as_secs_f64());
}
