//! Cache administration endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

#[derive(Debug, Clone, Serialize)]
pub struct DeleteKeyResponse {
    pub key: String,
    pub deleted: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub flushed: bool,
}

/// GET /admin/cache/keys
pub async fn list_keys(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    debug!("Listing cache keys");

    let keys = state.cache_admin.list_keys().await?;
    Ok(Json(keys))
}

/// GET /admin/cache/keys/{key}
///
/// Returns the stored value verbatim.
pub async fn get_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(key = %key, "Getting cache key");

    let raw = state.cache_admin.get_key(&key).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], raw))
}

/// DELETE /admin/cache/keys/{key}
pub async fn delete_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteKeyResponse>, ApiError> {
    let deleted = state.cache_admin.delete_key(&key).await?;
    Ok(Json(DeleteKeyResponse { key, deleted }))
}

/// DELETE /admin/cache/keys
pub async fn flush(State(state): State<AppState>) -> Result<Json<FlushResponse>, ApiError> {
    info!("Flushing mapping cache via admin API");

    state.cache_admin.flush().await?;
    Ok(Json(FlushResponse { flushed: true }))
}
