//! Mapping provider trait

use async_trait::async_trait;

use crate::domain::mapping::{LookupRequest, MappingResult};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Source of truth for identifier mappings (the OpenFIGI mapping API)
///
/// One call resolves a whole batch. The returned results are positionally
/// aligned with `requests`; callers should couple them through
/// [`super::pair_results`] rather than indexing two arrays side by side.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MappingProvider: Send + Sync {
    /// Resolves a batch in a single request
    ///
    /// Any non-success answer or transport failure is reported as
    /// [`DomainError::Upstream`]. No retries are attempted.
    async fn resolve(
        &self,
        requests: &[LookupRequest],
    ) -> Result<Vec<MappingResult>, DomainError>;
}
