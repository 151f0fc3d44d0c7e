//! FIGI mapping cache
//!
//! Resolves batches of security identifier lookups against the OpenFIGI
//! mapping API through a shared cache (cache-aside):
//! - One bulk cache read per batch, one upstream call for all misses
//! - Redis in production, in-memory store for local runs
//! - HTTP API, serverless gateway envelope and CLI entry points
//! - Optional archive of resolved mappings in PostgreSQL

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::cache::MappingCache;
use domain::DomainError;
use infrastructure::archive::ArchiveFactory;
use infrastructure::cache::CacheFactory;
use infrastructure::services::{BatchResolver, CacheAdminService};
use infrastructure::upstream::{OpenFigiClient, OpenFigiConfig};
use tracing::info;

/// Connects the configured mapping cache
pub async fn create_cache(config: &AppConfig) -> Result<Arc<dyn MappingCache>, DomainError> {
    CacheFactory::create(&config.cache).await
}

/// Builds the batch resolver on top of an existing cache
///
/// Fails with a configuration error when no API key is set.
pub async fn create_resolver(
    config: &AppConfig,
    cache: Arc<dyn MappingCache>,
) -> Result<BatchResolver, DomainError> {
    let client = OpenFigiClient::new(OpenFigiConfig::from_settings(&config.upstream)?)?;

    let mut resolver =
        BatchResolver::new(cache, Arc::new(client)).with_ordering(config.resolver.ordering);

    if let Some(archive) = ArchiveFactory::create(&config.archive).await? {
        resolver = resolver.with_archive(archive);
    }

    info!(
        ordering = %resolver.ordering(),
        upstream = %config.upstream.url,
        "Batch resolver ready"
    );

    Ok(resolver)
}

/// Create the application state with all services initialized
///
/// The API key is checked before the cache is connected.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.upstream.require_api_key()?;

    let cache = create_cache(config).await?;
    let resolver = create_resolver(config, cache.clone()).await?;

    Ok(AppState::new(resolver, CacheAdminService::new(cache)))
}
