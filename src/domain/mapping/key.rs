//! Cache key derivation for lookup requests

use std::fmt;

use crate::domain::DomainError;

use super::LookupRequest;

/// Separator placed between `idType` and `idValue`.
///
/// No escaping is performed: `("A_B", "C")` and `("A", "B_C")` collide.
pub const KEY_SEPARATOR: char = '_';

/// Key under which the mapping result of one lookup is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives `idType_idValue` for a single request
pub fn derive_key(request: &LookupRequest) -> Result<CacheKey, DomainError> {
    let id_type = request
        .id_type()
        .ok_or_else(|| DomainError::malformed_request("lookup request is missing 'idType'"))?;
    let id_value = request
        .id_value()
        .ok_or_else(|| DomainError::malformed_request("lookup request is missing 'idValue'"))?;

    Ok(CacheKey(format!("{}{}{}", id_type, KEY_SEPARATOR, id_value)))
}

/// Derives one key per request, preserving order and duplicates
///
/// Fails on the first malformed item, naming its position in the batch.
pub fn derive_keys(batch: &[LookupRequest]) -> Result<Vec<CacheKey>, DomainError> {
    batch
        .iter()
        .enumerate()
        .map(|(index, request)| {
            derive_key(request).map_err(|e| match e {
                DomainError::MalformedRequest { message } => {
                    DomainError::malformed_request(format!("item {}: {}", index, message))
                }
                other => other,
            })
        })
        .collect()
}
