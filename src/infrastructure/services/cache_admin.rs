//! Administration of the mapping cache

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::cache::MappingCache;
use crate::domain::DomainError;

/// Service for inspecting and clearing cached mappings
#[derive(Debug, Clone)]
pub struct CacheAdminService {
    cache: Arc<dyn MappingCache>,
}

impl CacheAdminService {
    pub fn new(cache: Arc<dyn MappingCache>) -> Self {
        Self { cache }
    }

    /// Lists every cached key
    pub async fn list_keys(&self) -> Result<Vec<String>, DomainError> {
        self.cache.keys().await
    }

    /// Returns the raw stored value for a key
    pub async fn get_key(&self, key: &str) -> Result<String, DomainError> {
        self.cache
            .get_raw(key)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Cache key '{}' not found", key)))
    }

    /// Deletes one key, returning how many entries were removed
    pub async fn delete_key(&self, key: &str) -> Result<u64, DomainError> {
        let deleted = self.cache.delete(key).await?;

        if deleted == 0 {
            warn!(key = %key, "Delete requested for missing cache key");
        } else {
            info!(key = %key, "Deleted cache key");
        }

        Ok(deleted)
    }

    /// Removes every cached mapping
    pub async fn flush(&self) -> Result<(), DomainError> {
        self.cache.flush().await?;
        info!("Flushed mapping cache");
        Ok(())
    }

    /// Checks that the cache is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.cache.ping().await
    }
}
