//! Mapping cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::mapping::CacheKey;
use crate::domain::DomainError;

/// Shared key-value store holding serialized mapping results
///
/// Entries carry no TTL: they live until overwritten or removed through the
/// administration operations. Implementations are shared by many concurrent
/// resolvers; no operation here is transactional across keys.
///
/// This trait uses JSON strings internally to be dyn-compatible.
/// Use [`MappingCacheExt`] for typed access.
#[async_trait]
pub trait MappingCache: Send + Sync + Debug {
    /// Reads several keys in one round-trip
    ///
    /// Returns exactly one slot per key, in the same order.
    async fn get_many_raw(&self, keys: &[CacheKey]) -> Result<Vec<Option<String>>, DomainError>;

    /// Unconditionally stores a raw JSON value
    async fn set_raw(&self, key: &CacheKey, value: &str) -> Result<(), DomainError>;

    /// Reads a single stored value by its literal key
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Lists every key in the store
    async fn keys(&self) -> Result<Vec<String>, DomainError>;

    /// Deletes one key, returning how many entries were removed
    async fn delete(&self, key: &str) -> Result<u64, DomainError>;

    /// Removes every entry from the store
    async fn flush(&self) -> Result<(), DomainError>;

    /// Verifies the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Extension trait providing typed bulk-get/set operations
pub trait MappingCacheExt: MappingCache {
    /// Reads and deserializes several keys at once
    ///
    /// A stored value that fails to parse is an error, not a miss.
    fn get_many<'a, V>(
        &'a self,
        keys: &'a [CacheKey],
    ) -> impl std::future::Future<Output = Result<Vec<Option<V>>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            let raw = self.get_many_raw(keys).await?;

            if raw.len() != keys.len() {
                return Err(DomainError::cache(format!(
                    "Bulk read returned {} values for {} keys",
                    raw.len(),
                    keys.len()
                )));
            }

            keys.iter()
                .zip(raw)
                .map(|(key, data)| match data {
                    Some(data) => serde_json::from_str(&data)
                        .map(Some)
                        .map_err(|e| DomainError::deserialization(key.as_str(), e.to_string())),
                    None => Ok(None),
                })
                .collect()
        }
    }

    /// Serializes and stores a value
    fn set<'a, V>(
        &'a self,
        key: &'a CacheKey,
        value: &'a V,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::cache(format!("Failed to serialize cache value: {}", e))
            })?;
            self.set_raw(key, &data).await
        }
    }
}

// Blanket implementation for all types implementing MappingCache
impl<T: MappingCache + ?Sized> MappingCacheExt for T {}
