//! Mapping archive trait

use async_trait::async_trait;

use crate::domain::DomainError;

use super::ArchivedMapping;

#[cfg(test)]
use mockall::automock;

/// Durable store of resolved mappings, kept for analytics
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MappingArchive: Send + Sync {
    /// Writes a batch of records, returning how many were stored
    async fn store(&self, records: Vec<ArchivedMapping>) -> Result<usize, DomainError>;

    /// Lists the records archived for one lookup identifier
    async fn find_by_id(&self, id: &str) -> Result<Vec<ArchivedMapping>, DomainError>;
}
