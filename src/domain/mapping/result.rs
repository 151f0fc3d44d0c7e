//! Mapping results and per-slot resolution outcomes

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Whatever the mapping API returned for one lookup
///
/// Typically `{"data": [...]}` or `{"error": "..."}`; never inspected by the
/// resolver, only stored and returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingResult(Value);

impl MappingResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for MappingResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Why a batch slot could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The mapping API call failed (non-success status or transport error)
    UpstreamFailure(String),
    /// The mapping API answered but returned no result for this position
    Omitted,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::UpstreamFailure(message) => {
                write!(f, "upstream failure: {}", message)
            }
            UnresolvedReason::Omitted => write!(f, "omitted by upstream"),
        }
    }
}

/// Outcome for one slot of a batch
///
/// Serializes as the mapping result itself, or `null` when unresolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(MappingResult),
    Unresolved(UnresolvedReason),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn result(&self) -> Option<&MappingResult> {
        match self {
            Resolution::Resolved(result) => Some(result),
            Resolution::Unresolved(_) => None,
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Resolution::Resolved(result) => result.serialize(serializer),
            Resolution::Unresolved(_) => serializer.serialize_none(),
        }
    }
}

/// Result of resolving one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub items: Vec<Resolution>,
    /// Number of slots served from the cache
    pub hits: usize,
    /// Number of slots that were not in the cache
    pub misses: usize,
    /// Whether the mapping API was called for this batch
    pub upstream_called: bool,
}

impl BatchOutcome {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            hits: 0,
            misses: 0,
            upstream_called: false,
        }
    }

    pub fn unresolved_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_resolved()).count()
    }
}
