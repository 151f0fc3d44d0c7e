//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_batch, record_http_request, record_upstream_call,
    PrometheusMetrics,
};
