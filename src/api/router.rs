use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::admin;
use super::health;
use super::middleware::metrics_middleware;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .nest("/admin", admin::create_admin_router())
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
