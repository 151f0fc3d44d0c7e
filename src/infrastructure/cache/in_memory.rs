//! In-memory mapping cache implementation using moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::MappingCache;
use crate::domain::mapping::CacheKey;
use crate::domain::DomainError;

/// Process-local mapping cache for development and tests
///
/// Mirrors the Redis store: no expiry, unconditional overwrite. Not shared
/// across processes.
#[derive(Debug)]
pub struct InMemoryMappingCache {
    cache: MokaCache<String, String>,
}

impl InMemoryMappingCache {
    pub fn new() -> Self {
        Self {
            cache: MokaCache::builder().build(),
        }
    }
}

impl Default for InMemoryMappingCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingCache for InMemoryMappingCache {
    async fn get_many_raw(&self, keys: &[CacheKey]) -> Result<Vec<Option<String>>, DomainError> {
        let mut values = Vec::with_capacity(keys.len());

        for key in keys {
            values.push(self.cache.get(key.as_str()).await);
        }

        Ok(values)
    }

    async fn set_raw(&self, key: &CacheKey, value: &str) -> Result<(), DomainError> {
        self.cache
            .insert(key.as_str().to_string(), value.to_string())
            .await;
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.cache.get(key).await)
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        let mut keys: Vec<String> = self.cache.iter().map(|(k, _)| k.as_ref().clone()).collect();
        keys.sort();
        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<u64, DomainError> {
        Ok(self.cache.remove(key).await.map_or(0, |_| 1))
    }

    async fn flush(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MappingCacheExt;
    use crate::domain::mapping::derive_key;
    use crate::domain::{LookupRequest, MappingResult};
    use serde_json::json;

    fn key(value: &str) -> CacheKey {
        derive_key(&LookupRequest::new("TICKER", value)).unwrap()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let cache = InMemoryMappingCache::new();
        let value = MappingResult::new(json!({"data": [{"figi": "BBG000BPH459"}]}));

        cache.set(&key("MSFT"), &value).await.unwrap();

        let read: Vec<Option<MappingResult>> = cache.get_many(&[key("MSFT")]).await.unwrap();
        assert_eq!(read, vec![Some(value)]);
    }

    #[tokio::test]
    async fn test_get_many_preserves_order_and_length() {
        let cache = InMemoryMappingCache::new();
        cache.set_raw(&key("AAPL"), "1").await.unwrap();
        cache.set_raw(&key("IBM"), "3").await.unwrap();

        let read = cache
            .get_many_raw(&[key("IBM"), key("MSFT"), key("AAPL"), key("IBM")])
            .await
            .unwrap();

        assert_eq!(
            read,
            vec![
                Some("3".to_string()),
                None,
                Some("1".to_string()),
                Some("3".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = InMemoryMappingCache::new();

        cache.set_raw(&key("AAPL"), "{\"v\":1}").await.unwrap();
        cache.set_raw(&key("AAPL"), "{\"v\":2}").await.unwrap();

        assert_eq!(
            cache.get_raw("TICKER_AAPL").await.unwrap(),
            Some("{\"v\":2}".to_string())
        );
    }

    #[tokio::test]
    async fn test_keys_delete_and_flush() {
        let cache = InMemoryMappingCache::new();
        cache.set_raw(&key("MSFT"), "{}").await.unwrap();
        cache.set_raw(&key("AAPL"), "{}").await.unwrap();

        assert_eq!(
            cache.keys().await.unwrap(),
            vec!["TICKER_AAPL".to_string(), "TICKER_MSFT".to_string()]
        );

        assert_eq!(cache.delete("TICKER_AAPL").await.unwrap(), 1);
        assert_eq!(cache.delete("TICKER_AAPL").await.unwrap(), 0);

        cache.flush().await.unwrap();
        assert!(cache.keys().await.unwrap().is_empty());
    }
}
