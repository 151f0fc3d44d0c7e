//! Versioned mapping API

pub mod mappings;

use axum::{routing::post, Router};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new().route("/mapping", post(mappings::resolve_mappings))
}
