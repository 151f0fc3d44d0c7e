//! Lookup request as submitted by clients and forwarded to the mapping API

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single identifier lookup (`{"idType": "TICKER", "idValue": "AAPL", ...}`)
///
/// `idType` and `idValue` are optional at parse time so that a batch with a
/// broken item can be rejected with a precise error instead of a generic
/// JSON rejection. Any other OpenFIGI request field is carried verbatim and
/// forwarded upstream, but does not take part in the cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupRequest {
    #[serde(
        rename = "idType",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    id_type: Option<String>,

    #[serde(
        rename = "idValue",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    id_value: Option<String>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl LookupRequest {
    pub fn new(id_type: impl Into<String>, id_value: impl Into<String>) -> Self {
        Self {
            id_type: Some(id_type.into()),
            id_value: Some(id_value.into()),
            extra: Map::new(),
        }
    }

    /// Adds an extra request field (e.g. `exchCode`) forwarded to the mapping API
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn id_type(&self) -> Option<&str> {
        self.id_type.as_deref()
    }

    pub fn id_value(&self) -> Option<&str> {
        self.id_value.as_deref()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}
