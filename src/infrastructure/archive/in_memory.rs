//! In-memory mapping archive

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::archive::{ArchivedMapping, MappingArchive};
use crate::domain::DomainError;

/// Thread-safe in-memory archive
///
/// Useful for testing and development. Records are lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryMappingArchive {
    records: RwLock<Vec<ArchivedMapping>>,
}

impl InMemoryMappingArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MappingArchive for InMemoryMappingArchive {
    async fn store(&self, records: Vec<ArchivedMapping>) -> Result<usize, DomainError> {
        let mut stored = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let count = records.len();
        for record in records {
            // Same lookup and FIGI replaces the earlier record
            stored.retain(|existing| !(existing.id == record.id && existing.figi == record.figi));
            stored.push(record);
        }

        Ok(count)
    }

    async fn find_by_id(&self, id: &str) -> Result<Vec<ArchivedMapping>, DomainError> {
        let stored = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(stored.iter().filter(|record| record.id == id).cloned().collect())
    }
}
