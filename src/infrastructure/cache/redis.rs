//! Redis mapping cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::debug;

use crate::domain::cache::MappingCache;
use crate::domain::mapping::CacheKey;
use crate::domain::DomainError;

/// Configuration for the Redis mapping cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Bound on establishing the connection
    pub connection_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            connection_timeout: Duration::from_secs(2),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Redis-backed mapping cache
///
/// Values are stored with plain `SET` (no expiry); bulk reads use a single
/// `MGET`. The connection is shared through a `ConnectionManager`, which
/// reconnects transparently after failures.
#[derive(Clone)]
pub struct RedisMappingCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisMappingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisMappingCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisMappingCache {
    /// Connects to Redis, failing with `CacheUnavailable` after the timeout
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::configuration(format!("Invalid Redis URL '{}': {}", config.url, e))
        })?;

        let connection = tokio::time::timeout(
            config.connection_timeout,
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| {
            DomainError::cache_unavailable(format!(
                "Timed out connecting to Redis at {} after {:?}",
                config.url, config.connection_timeout
            ))
        })?
        .map_err(|e| DomainError::cache_unavailable(format!("Failed to connect to Redis: {}", e)))?;

        debug!(url = %config.url, "Connected to Redis");

        Ok(Self { connection, config })
    }

    /// Creates a Redis cache with default configuration
    pub async fn with_url(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(RedisCacheConfig::new(url)).await
    }
}

fn command_error(action: &str, e: redis::RedisError) -> DomainError {
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() || e.is_io_error()
    {
        DomainError::cache_unavailable(format!("Failed to {}: {}", action, e))
    } else {
        DomainError::cache(format!("Failed to {}: {}", action, e))
    }
}

#[async_trait]
impl MappingCache for RedisMappingCache {
    async fn get_many_raw(&self, keys: &[CacheKey]) -> Result<Vec<Option<String>>, DomainError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.connection.clone();
        let args: Vec<&str> = keys.iter().map(CacheKey::as_str).collect();

        // Explicit MGET: the typed helper degrades to GET for a single key
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&args)
            .query_async(&mut conn)
            .await
            .map_err(|e| command_error(&format!("read {} keys", keys.len()), e))?;

        Ok(values)
    }

    async fn set_raw(&self, key: &CacheKey, value: &str) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: () = conn
            .set(key.as_str(), value)
            .await
            .map_err(|e| command_error(&format!("set key '{}'", key), e))?;

        Ok(())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.connection.clone();

        let result: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| command_error(&format!("get key '{}'", key), e))?;

        Ok(result)
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();

        // Use SCAN to find keys (safer than KEYS for production)
        let mut cursor = 0u64;
        let mut keys = Vec::new();

        loop {
            let (new_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("COUNT")
                .arg(1000)
                .query_async(&mut conn)
                .await
                .map_err(|e| command_error("scan keys", e))?;

            keys.extend(batch);
            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        keys.sort();
        keys.dedup();

        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<u64, DomainError> {
        let mut conn = self.connection.clone();

        let deleted: u64 = conn
            .del(key)
            .await
            .map_err(|e| command_error(&format!("delete key '{}'", key), e))?;

        Ok(deleted)
    }

    async fn flush(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| command_error("flush database", e))?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| command_error("ping Redis", e))?;

        Ok(())
    }
}
