//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::MappingCache;
use crate::domain::upstream::MappingProvider;
use crate::infrastructure::services::{BatchResolver, CacheAdminService};

/// Services shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Arc<BatchResolver>,
    pub cache_admin: Arc<CacheAdminService>,
}

impl AppState {
    pub fn new(resolver: BatchResolver, cache_admin: CacheAdminService) -> Self {
        Self {
            resolver: Arc::new(resolver),
            cache_admin: Arc::new(cache_admin),
        }
    }

    /// Builds the state around one cache and provider with default resolver settings
    pub fn from_parts(cache: Arc<dyn MappingCache>, provider: Arc<dyn MappingProvider>) -> Self {
        Self::new(
            BatchResolver::new(cache.clone(), provider),
            CacheAdminService::new(cache),
        )
    }
}
