//! Archive factory

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ArchiveSettings;
use crate::domain::archive::MappingArchive;
use crate::domain::DomainError;

use super::in_memory::InMemoryMappingArchive;
use super::postgres::{PostgresArchiveConfig, PostgresMappingArchive};

/// Factory for creating the mapping archive
#[derive(Debug)]
pub struct ArchiveFactory;

impl ArchiveFactory {
    /// Creates the configured archive, or `None` when archiving is disabled
    ///
    /// An enabled archive without a database URL falls back to memory.
    pub async fn create(
        settings: &ArchiveSettings,
    ) -> Result<Option<Arc<dyn MappingArchive>>, DomainError> {
        if !settings.enabled {
            info!("Mapping archive disabled");
            return Ok(None);
        }

        match settings.database_url.as_deref() {
            Some(url) => {
                let config = PostgresArchiveConfig::new(url)
                    .with_table(&settings.table)
                    .with_max_connections(settings.max_connections);

                let archive = PostgresMappingArchive::connect(&config).await?;
                info!(table = %settings.table, "Mapping archive backed by PostgreSQL");
                Ok(Some(Arc::new(archive)))
            }
            None => {
                warn!("Mapping archive enabled without database_url, using in-memory archive");
                Ok(Some(Arc::new(InMemoryMappingArchive::new())))
            }
        }
    }
}
