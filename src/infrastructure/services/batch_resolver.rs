//! Batch cache-aside resolution of identifier lookups

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::domain::archive::{flatten_mapping, ArchivedMapping, MappingArchive};
use crate::domain::cache::{MappingCache, MappingCacheExt};
use crate::domain::mapping::{
    derive_key, derive_keys, BatchOutcome, LookupRequest, MappingResult, OrderingPolicy,
    Resolution, UnresolvedReason,
};
use crate::domain::upstream::{pair_results, MappingPair, MappingProvider};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_batch, record_upstream_call};

/// Resolves batches against the shared cache, falling back to one mapping
/// API call for everything the cache does not hold
///
/// Each invocation is sequential. Concurrent invocations share the cache and
/// provider; misses on the same key are not coordinated, so each invocation
/// calls upstream and overwrites the entry.
pub struct BatchResolver {
    cache: Arc<dyn MappingCache>,
    provider: Arc<dyn MappingProvider>,
    ordering: OrderingPolicy,
    archive: Option<Arc<dyn MappingArchive>>,
}

impl fmt::Debug for BatchResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchResolver")
            .field("cache", &self.cache)
            .field("ordering", &self.ordering)
            .field("archive", &self.archive.is_some())
            .finish()
    }
}

impl BatchResolver {
    pub fn new(cache: Arc<dyn MappingCache>, provider: Arc<dyn MappingProvider>) -> Self {
        Self {
            cache,
            provider,
            ordering: OrderingPolicy::default(),
            archive: None,
        }
    }

    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    /// Records every newly resolved mapping in the given archive
    pub fn with_archive(mut self, archive: Arc<dyn MappingArchive>) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// Resolves one batch
    ///
    /// Keys are derived for every item before any cache I/O, so a malformed
    /// item fails the batch without touching the cache. The mapping API is
    /// called at most once, and only when there are misses. A failed API call
    /// leaves every miss unresolved and writes nothing; cache errors and
    /// corrupt cached values fail the batch.
    #[instrument(skip(self, batch), fields(batch_size = batch.len(), ordering = %self.ordering))]
    pub async fn resolve(&self, batch: &[LookupRequest]) -> Result<BatchOutcome, DomainError> {
        if batch.is_empty() {
            debug!("Empty batch, nothing to resolve");
            return Ok(BatchOutcome::empty());
        }

        let keys = derive_keys(batch)?;
        let cached: Vec<Option<MappingResult>> = self.cache.get_many(&keys).await?;

        let mut misses = Vec::new();
        let mut miss_index = Vec::new();
        for (index, (request, entry)) in batch.iter().zip(&cached).enumerate() {
            if entry.is_none() {
                misses.push(request.clone());
                miss_index.push(index);
            }
        }

        let hits = batch.len() - misses.len();
        debug!(hits, misses = misses.len(), "Partitioned batch");

        let resolved = self.resolve_misses(&misses).await?;
        let items = assemble(self.ordering, cached, &miss_index, resolved);

        let outcome = BatchOutcome {
            items,
            hits,
            misses: misses.len(),
            upstream_called: !misses.is_empty(),
        };

        let unresolved = outcome.unresolved_count();
        record_batch(outcome.hits, outcome.misses, unresolved);
        info!(
            hits = outcome.hits,
            misses = outcome.misses,
            unresolved,
            returned = outcome.items.len(),
            "Batch resolved"
        );

        Ok(outcome)
    }

    /// Calls the mapping API for the misses and writes back what it returns
    ///
    /// Returns one resolution per miss, in miss order.
    async fn resolve_misses(
        &self,
        misses: &[LookupRequest],
    ) -> Result<Vec<Resolution>, DomainError> {
        if misses.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let results = match self.provider.resolve(misses).await {
            Ok(results) => {
                record_upstream_call(true, misses.len(), started.elapsed());
                results
            }
            Err(e) => {
                record_upstream_call(false, misses.len(), started.elapsed());
                warn!(error = %e, misses = misses.len(), "Mapping API call failed, misses left unresolved");

                let reason = UnresolvedReason::UpstreamFailure(e.to_string());
                return Ok(vec![Resolution::Unresolved(reason); misses.len()]);
            }
        };

        let mut resolutions = Vec::with_capacity(misses.len());
        let mut archived = Vec::new();

        for MappingPair { request, result } in pair_results(misses, results) {
            let Some(result) = result else {
                resolutions.push(Resolution::Unresolved(UnresolvedReason::Omitted));
                continue;
            };

            let key = derive_key(request)?;
            self.cache.set(&key, &result).await?;
            debug!(key = %key, "Cached mapping result");

            if self.archive.is_some() {
                archived.extend(flatten_mapping(&key, &result));
            }
            resolutions.push(Resolution::Resolved(result));
        }

        self.archive_records(archived).await;

        Ok(resolutions)
    }

    async fn archive_records(&self, records: Vec<ArchivedMapping>) {
        let Some(archive) = &self.archive else {
            return;
        };
        if records.is_empty() {
            return;
        }

        let count = records.len();
        match archive.store(records).await {
            Ok(stored) => debug!(stored, "Archived resolved mappings"),
            Err(e) => warn!(error = %e, records = count, "Failed to archive resolved mappings"),
        }
    }
}

/// Builds the output list from the cached slots and the miss resolutions
///
/// `cached` has one slot per input item (`None` for a miss); `resolved` has
/// one entry per miss, aligned with `miss_index`.
pub(crate) fn assemble(
    ordering: OrderingPolicy,
    cached: Vec<Option<MappingResult>>,
    miss_index: &[usize],
    resolved: Vec<Resolution>,
) -> Vec<Resolution> {
    match ordering {
        OrderingPolicy::Positional => {
            let mut items: Vec<Resolution> = cached
                .into_iter()
                .map(|entry| match entry {
                    Some(result) => Resolution::Resolved(result),
                    None => Resolution::Unresolved(UnresolvedReason::Omitted),
                })
                .collect();

            for (&index, resolution) in miss_index.iter().zip(resolved) {
                items[index] = resolution;
            }
            items
        }
        OrderingPolicy::HitsFirst => cached
            .into_iter()
            .flatten()
            .map(Resolution::Resolved)
            .chain(resolved.into_iter().filter(Resolution::is_resolved))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::archive::MockMappingArchive;
    use crate::domain::cache::MockMappingCache;
    use crate::domain::upstream::MockMappingProvider;
    use serde_json::json;

    fn ticker(value: &str) -> LookupRequest {
        LookupRequest::new("TICKER", value)
    }

    fn figi(figi: &str) -> MappingResult {
        MappingResult::new(json!({"data": [{"figi": figi, "exchCode": "US"}]}))
    }

    fn resolver(cache: &Arc<MockMappingCache>, provider: MockMappingProvider) -> BatchResolver {
        BatchResolver::new(cache.clone(), Arc::new(provider))
    }

    fn unused_provider() -> MockMappingProvider {
        let mut provider = MockMappingProvider::new();
        provider.expect_resolve().times(0);
        provider
    }

    #[tokio::test]
    async fn test_all_hits_never_calls_upstream() {
        let cache = Arc::new(
            MockMappingCache::new()
                .with_entry(&ticker("AAPL"), &figi("BBG000B9XRY4"))
                .with_entry(&ticker("MSFT"), &figi("BBG000BPH459")),
        );

        let outcome = resolver(&cache, unused_provider())
            .resolve(&[ticker("AAPL"), ticker("MSFT")])
            .await
            .unwrap();

        assert_eq!(outcome.hits, 2);
        assert_eq!(outcome.misses, 0);
        assert!(!outcome.upstream_called);
        assert_eq!(
            outcome.items,
            vec![
                Resolution::Resolved(figi("BBG000B9XRY4")),
                Resolution::Resolved(figi("BBG000BPH459")),
            ]
        );
        assert!(cache.writes().is_empty());
        assert_eq!(cache.bulk_reads().len(), 1);
    }

    #[tokio::test]
    async fn test_all_misses_resolved_and_cached() {
        let cache = Arc::new(MockMappingCache::new());

        let mut provider = MockMappingProvider::new();
        provider
            .expect_resolve()
            .withf(|requests| requests.to_vec() == vec![ticker("AAPL"), ticker("MSFT")])
            .times(1)
            .returning(|_| Ok(vec![figi("BBG000B9XRY4"), figi("BBG000BPH459")]));

        let outcome = resolver(&cache, provider)
            .resolve(&[ticker("AAPL"), ticker("MSFT")])
            .await
            .unwrap();

        assert_eq!(outcome.misses, 2);
        assert!(outcome.upstream_called);
        assert_eq!(
            serde_json::to_value(&outcome.items).unwrap(),
            json!([
                {"data": [{"figi": "BBG000B9XRY4", "exchCode": "US"}]},
                {"data": [{"figi": "BBG000BPH459", "exchCode": "US"}]}
            ])
        );
        assert_eq!(cache.writes(), vec!["TICKER_AAPL", "TICKER_MSFT"]);

        let stored: MappingResult =
            serde_json::from_str(&cache.raw("TICKER_MSFT").unwrap()).unwrap();
        assert_eq!(stored, figi("BBG000BPH459"));
    }

    #[tokio::test]
    async fn test_partial_hit_sends_only_misses_upstream() {
        let cache =
            Arc::new(MockMappingCache::new().with_entry(&ticker("AAPL"), &figi("BBG000B9XRY4")));

        let mut provider = MockMappingProvider::new();
        provider
            .expect_resolve()
            .withf(|requests| requests.to_vec() == vec![ticker("MSFT")])
            .times(1)
            .returning(|_| Ok(vec![figi("BBG000BPH459")]));

        let outcome = resolver(&cache, provider)
            .resolve(&[ticker("AAPL"), ticker("MSFT")])
            .await
            .unwrap();

        assert_eq!(outcome.hits, 1);
        assert_eq!(outcome.misses, 1);
        assert_eq!(
            outcome.items,
            vec![
                Resolution::Resolved(figi("BBG000B9XRY4")),
                Resolution::Resolved(figi("BBG000BPH459")),
            ]
        );
        assert_eq!(cache.writes(), vec!["TICKER_MSFT"]);
    }

    #[tokio::test]
    async fn test_upstream_failure_writes_nothing() {
        let cache =
            Arc::new(MockMappingCache::new().with_entry(&ticker("AAPL"), &figi("BBG000B9XRY4")));

        let mut provider = MockMappingProvider::new();
        provider
            .expect_resolve()
            .times(1)
            .returning(|_| Err(DomainError::upstream_status(500, "Internal Server Error")));

        let outcome = resolver(&cache, provider)
            .resolve(&[ticker("MSFT"), ticker("AAPL"), ticker("IBM")])
            .await
            .unwrap();

        assert!(cache.writes().is_empty());
        assert_eq!(outcome.unresolved_count(), 2);
        assert!(matches!(
            &outcome.items[0],
            Resolution::Unresolved(UnresolvedReason::UpstreamFailure(message)) if message.contains("500")
        ));
        assert_eq!(outcome.items[1], Resolution::Resolved(figi("BBG000B9XRY4")));
        assert_eq!(
            serde_json::to_value(&outcome.items).unwrap(),
            json!([null, {"data": [{"figi": "BBG000B9XRY4", "exchCode": "US"}]}, null])
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_hits_first_drops_misses() {
        let cache = Arc::new(MockMappingCache::new());

        let mut provider = MockMappingProvider::new();
        provider
            .expect_resolve()
            .returning(|_| Err(DomainError::upstream_transport("connection reset")));

        let outcome = resolver(&cache, provider)
            .with_ordering(OrderingPolicy::HitsFirst)
            .resolve(&[ticker("AAPL"), ticker("MSFT")])
            .await
            .unwrap();

        assert!(outcome.items.is_empty());
        assert!(cache.writes().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let cache = Arc::new(MockMappingCache::new());

        let outcome = resolver(&cache, unused_provider()).resolve(&[]).await.unwrap();

        assert_eq!(outcome, BatchOutcome::empty());
        assert_eq!(cache.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_short_response_marks_trailing_misses_omitted() {
        let cache = Arc::new(MockMappingCache::new());

        let mut provider = MockMappingProvider::new();
        provider
            .expect_resolve()
            .returning(|_| Ok(vec![figi("BBG000B9XRY4")]));

        let outcome = resolver(&cache, provider)
            .resolve(&[ticker("AAPL"), ticker("MSFT")])
            .await
            .unwrap();

        assert_eq!(outcome.items[0], Resolution::Resolved(figi("BBG000B9XRY4")));
        assert_eq!(
            outcome.items[1],
            Resolution::Unresolved(UnresolvedReason::Omitted)
        );
        assert_eq!(cache.writes(), vec!["TICKER_AAPL"]);
    }

    #[tokio::test]
    async fn test_interleaved_batch_ordering() {
        let seeded = || {
            Arc::new(
                MockMappingCache::new()
                    .with_entry(&ticker("A"), &figi("FA"))
                    .with_entry(&ticker("C"), &figi("FC")),
            )
        };
        let provider = || {
            let mut provider = MockMappingProvider::new();
            provider
                .expect_resolve()
                .withf(|requests| requests.to_vec() == vec![ticker("B"), ticker("D")])
                .times(1)
                .returning(|_| Ok(vec![figi("FB"), figi("FD")]));
            provider
        };
        let batch = [ticker("A"), ticker("B"), ticker("C"), ticker("D")];

        let positional = resolver(&seeded(), provider())
            .resolve(&batch)
            .await
            .unwrap();
        let hits_first = resolver(&seeded(), provider())
            .with_ordering(OrderingPolicy::HitsFirst)
            .resolve(&batch)
            .await
            .unwrap();

        let figis = |items: &[Resolution]| -> Vec<String> {
            items
                .iter()
                .map(|item| {
                    item.result().unwrap().as_value()["data"][0]["figi"]
                        .as_str()
                        .unwrap()
                        .to_string()
                })
                .collect()
        };

        assert_eq!(figis(&positional.items), vec!["FA", "FB", "FC", "FD"]);
        assert_eq!(figis(&hits_first.items), vec!["FA", "FC", "FB", "FD"]);
    }

    #[tokio::test]
    async fn test_single_miss_both_policies() {
        for ordering in [OrderingPolicy::Positional, OrderingPolicy::HitsFirst] {
            let cache = Arc::new(MockMappingCache::new());
            let mut provider = MockMappingProvider::new();
            provider
                .expect_resolve()
                .times(1)
                .returning(|_| Ok(vec![figi("BBG000B9XRY4")]));

            let outcome = resolver(&cache, provider)
                .with_ordering(ordering)
                .resolve(&[ticker("AAPL")])
                .await
                .unwrap();

            assert_eq!(outcome.items, vec![Resolution::Resolved(figi("BBG000B9XRY4"))]);
        }
    }

    #[tokio::test]
    async fn test_single_hit_both_policies() {
        for ordering in [OrderingPolicy::Positional, OrderingPolicy::HitsFirst] {
            let cache = Arc::new(MockMappingCache::new().with_entry(&ticker("AAPL"), &figi("BBG000B9XRY4")));

            let outcome = resolver(&cache, unused_provider())
                .with_ordering(ordering)
                .resolve(&[ticker("AAPL")])
                .await
                .unwrap();

            assert_eq!(outcome.items, vec![Resolution::Resolved(figi("BBG000B9XRY4"))]);
            assert!(!outcome.upstream_called);
            assert!(cache.writes().is_empty());
        }
    }

    #[tokio::test]
    async fn test_all_hits_batch_both_policies() {
        for ordering in [OrderingPolicy::Positional, OrderingPolicy::HitsFirst] {
            let cache = Arc::new(
                MockMappingCache::new()
                    .with_entry(&ticker("A"), &figi("FA"))
                    .with_entry(&ticker("B"), &figi("FB"))
                    .with_entry(&ticker("C"), &figi("FC")),
            );

            let outcome = resolver(&cache, unused_provider())
                .with_ordering(ordering)
                .resolve(&[ticker("C"), ticker("A"), ticker("B")])
                .await
                .unwrap();

            assert_eq!(
                outcome.items,
                vec![
                    Resolution::Resolved(figi("FC")),
                    Resolution::Resolved(figi("FA")),
                    Resolution::Resolved(figi("FB")),
                ]
            );
            assert_eq!(outcome.hits, 3);
            assert!(cache.writes().is_empty());
        }
    }

    #[tokio::test]
    async fn test_all_misses_batch_both_policies() {
        for ordering in [OrderingPolicy::Positional, OrderingPolicy::HitsFirst] {
            let cache = Arc::new(MockMappingCache::new());
            let mut provider = MockMappingProvider::new();
            provider
                .expect_resolve()
                .withf(|requests| requests.to_vec() == vec![ticker("C"), ticker("A"), ticker("B")])
                .times(1)
                .returning(|_| Ok(vec![figi("FC"), figi("FA"), figi("FB")]));

            let outcome = resolver(&cache, provider)
                .with_ordering(ordering)
                .resolve(&[ticker("C"), ticker("A"), ticker("B")])
                .await
                .unwrap();

            assert_eq!(
                outcome.items,
                vec![
                    Resolution::Resolved(figi("FC")),
                    Resolution::Resolved(figi("FA")),
                    Resolution::Resolved(figi("FB")),
                ]
            );
            assert_eq!(cache.writes(), vec!["TICKER_C", "TICKER_A", "TICKER_B"]);
        }
    }

    #[tokio::test]
    async fn test_duplicate_items_preserved() {
        let cache = Arc::new(MockMappingCache::new());

        let mut provider = MockMappingProvider::new();
        provider
            .expect_resolve()
            .withf(|requests| requests.len() == 2)
            .returning(|_| Ok(vec![figi("BBG000B9XRY4"), figi("BBG000B9XRY4")]));

        let outcome = resolver(&cache, provider)
            .resolve(&[ticker("AAPL"), ticker("AAPL")])
            .await
            .unwrap();

        assert_eq!(outcome.items.len(), 2);
        assert_eq!(cache.writes(), vec!["TICKER_AAPL", "TICKER_AAPL"]);
    }

    #[tokio::test]
    async fn test_corrupt_cached_value_fails_batch() {
        let cache = Arc::new(MockMappingCache::new().with_raw_entry("TICKER_AAPL", "{not json"));

        let result = resolver(&cache, unused_provider())
            .resolve(&[ticker("AAPL")])
            .await;

        match result {
            Err(DomainError::Deserialization { key, .. }) => assert_eq!(key, "TICKER_AAPL"),
            other => panic!("expected deserialization error, got {:?}", other),
        }
        assert!(cache.writes().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_item_makes_no_cache_calls() {
        let cache = Arc::new(MockMappingCache::new());
        let broken: LookupRequest = serde_json::from_value(json!({"idType": "TICKER"})).unwrap();

        let result = resolver(&cache, unused_provider())
            .resolve(&[ticker("AAPL"), broken])
            .await;

        assert!(matches!(result, Err(DomainError::MalformedRequest { .. })));
        assert_eq!(cache.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_cache_fails_batch() {
        let cache = Arc::new(MockMappingCache::new().with_error("connection refused"));

        let result = resolver(&cache, unused_provider())
            .resolve(&[ticker("AAPL")])
            .await;

        assert!(matches!(result, Err(DomainError::CacheUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_resolved_misses_are_archived() {
        let cache = Arc::new(MockMappingCache::new());

        let mut provider = MockMappingProvider::new();
        provider.expect_resolve().returning(|_| {
            Ok(vec![
                figi("BBG000B9XRY4"),
                MappingResult::new(json!({"error": "No identifier found."})),
            ])
        });

        let mut archive = MockMappingArchive::new();
        archive
            .expect_store()
            .withf(|records| {
                records.len() == 1
                    && records[0].id == "TICKER_AAPL"
                    && records[0].figi.as_deref() == Some("BBG000B9XRY4")
            })
            .times(1)
            .returning(|records| Ok(records.len()));

        let outcome = resolver(&cache, provider)
            .with_archive(Arc::new(archive))
            .resolve(&[ticker("AAPL"), ticker("NOPE")])
            .await
            .unwrap();

        assert_eq!(outcome.unresolved_count(), 0);
    }

    #[tokio::test]
    async fn test_archive_failure_does_not_fail_batch() {
        let cache = Arc::new(MockMappingCache::new());

        let mut provider = MockMappingProvider::new();
        provider
            .expect_resolve()
            .returning(|_| Ok(vec![figi("BBG000B9XRY4")]));

        let mut archive = MockMappingArchive::new();
        archive
            .expect_store()
            .times(1)
            .returning(|_| Err(DomainError::storage("database is down")));

        let outcome = resolver(&cache, provider)
            .with_archive(Arc::new(archive))
            .resolve(&[ticker("AAPL")])
            .await
            .unwrap();

        assert_eq!(outcome.items, vec![Resolution::Resolved(figi("BBG000B9XRY4"))]);
        assert_eq!(cache.writes(), vec!["TICKER_AAPL"]);
    }

    #[tokio::test]
    async fn test_hits_are_not_archived() {
        let cache =
            Arc::new(MockMappingCache::new().with_entry(&ticker("AAPL"), &figi("BBG000B9XRY4")));

        let mut archive = MockMappingArchive::new();
        archive.expect_store().times(0);

        resolver(&cache, unused_provider())
            .with_archive(Arc::new(archive))
            .resolve(&[ticker("AAPL")])
            .await
            .unwrap();
    }

    #[test]
    fn test_assemble_empty() {
        for ordering in [OrderingPolicy::Positional, OrderingPolicy::HitsFirst] {
            assert!(assemble(ordering, Vec::new(), &[], Vec::new()).is_empty());
        }
    }

    #[test]
    fn test_assemble_positional_keeps_unresolved_slots() {
        let items = assemble(
            OrderingPolicy::Positional,
            vec![None, Some(figi("FB")), None],
            &[0, 2],
            vec![
                Resolution::Unresolved(UnresolvedReason::Omitted),
                Resolution::Resolved(figi("FC")),
            ],
        );

        assert_eq!(
            items,
            vec![
                Resolution::Unresolved(UnresolvedReason::Omitted),
                Resolution::Resolved(figi("FB")),
                Resolution::Resolved(figi("FC")),
            ]
        );
    }
}
