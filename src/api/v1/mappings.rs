//! Mapping endpoint handler

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{LookupRequest, Resolution};

/// POST /v1/mapping
///
/// Body is a JSON array of lookups; the response holds one entry per output
/// slot, `null` where a lookup could not be resolved.
pub async fn resolve_mappings(
    State(state): State<AppState>,
    Json(batch): Json<Vec<LookupRequest>>,
) -> Result<Json<Vec<Resolution>>, ApiError> {
    debug!(batch_size = batch.len(), "Resolving mapping batch");

    let outcome = state.resolver.resolve(&batch).await?;

    Ok(Json(outcome.items))
}
