//! Cache factory for runtime selection

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{CacheBackend, CacheSettings};
use crate::domain::cache::MappingCache;
use crate::domain::DomainError;

use super::in_memory::InMemoryMappingCache;
use super::redis::{RedisCacheConfig, RedisMappingCache};

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackend::InMemory => write!(f, "in_memory"),
            CacheBackend::Redis => write!(f, "redis"),
        }
    }
}

/// Factory for creating mapping caches
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a cache based on settings
    pub async fn create(settings: &CacheSettings) -> Result<Arc<dyn MappingCache>, DomainError> {
        debug!(backend = %settings.backend, "Creating mapping cache");

        match settings.backend {
            CacheBackend::InMemory => {
                info!("Using in-memory mapping cache");
                Ok(Arc::new(InMemoryMappingCache::new()))
            }
            CacheBackend::Redis => {
                let config = RedisCacheConfig::new(settings.redis_url())
                    .with_connection_timeout(settings.connect_timeout());

                info!(
                    host = %settings.host(),
                    port = settings.port,
                    is_local = settings.is_local,
                    "Using Redis mapping cache"
                );

                Ok(Arc::new(RedisMappingCache::new(config).await?))
            }
        }
    }
}
