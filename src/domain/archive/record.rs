//! Archive record and flattening of mapping results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::mapping::{CacheKey, MappingResult};

/// One instrument of a mapping result, tagged with the lookup it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedMapping {
    /// Lookup identifier (`idType_idValue`)
    pub id: String,
    /// FIGI of the instrument, when the API returned one
    pub figi: Option<String>,
    /// The instrument object exactly as returned, plus the `id` field
    pub payload: Map<String, Value>,
}

/// Flattens the `data` array of a mapping result into archive records
///
/// Results without a `data` array (e.g. `{"error": "No identifier found."}`)
/// produce no records. Non-object elements are skipped.
pub fn flatten_mapping(key: &CacheKey, result: &MappingResult) -> Vec<ArchivedMapping> {
    let Some(data) = result.as_value().get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    data.iter()
        .filter_map(Value::as_object)
        .map(|item| {
            let mut payload = item.clone();
            payload.insert("id".to_string(), Value::String(key.to_string()));

            ArchivedMapping {
                id: key.to_string(),
                figi: item.get("figi").and_then(Value::as_str).map(str::to_string),
                payload,
            }
        })
        .collect()
}
