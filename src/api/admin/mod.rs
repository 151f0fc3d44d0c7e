//! Admin API endpoints

pub mod cache;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/cache/keys", get(cache::list_keys).delete(cache::flush))
        .route(
            "/cache/keys/{key}",
            get(cache::get_key).delete(cache::delete_key),
        )
}
