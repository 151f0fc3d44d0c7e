use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DomainError, OrderingPolicy};

/// Default OpenFIGI mapping endpoint
pub const DEFAULT_MAPPING_URL: &str = "https://api.openfigi.com/v3/mapping";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub archive: ArchiveSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which store backs the mapping cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    Redis,
    InMemory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    /// Production cache host
    pub endpoint: String,
    pub port: u16,
    /// Use the local sandbox endpoint instead of `endpoint`
    pub is_local: bool,
    pub local_endpoint: String,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub ordering: OrderingPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    pub enabled: bool,
    pub database_url: Option<String>,
    pub table: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            endpoint: "localhost".to_string(),
            port: 6379,
            is_local: false,
            local_endpoint: "localhost".to_string(),
            connect_timeout_secs: 2,
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_MAPPING_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            database_url: None,
            table: "mappings_v3".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl CacheSettings {
    /// Host actually used, honouring the local sandbox flag
    pub fn host(&self) -> &str {
        if self.is_local {
            &self.local_endpoint
        } else {
            &self.endpoint
        }
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}", self.host(), self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl UpstreamSettings {
    /// Returns the API key or fails with a configuration error
    pub fn require_api_key(&self) -> Result<&str, DomainError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(DomainError::configuration(
                "API_KEY environment variable is not set",
            )),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Loads configuration from files, `APP__*` variables and the legacy
    /// `API_KEY` / `REDIS_ENDPOINT` / `REDIS_PORT` / `IS_LOCAL` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("upstream.api_key", env_var("API_KEY"))?
            .set_override_option("cache.endpoint", env_var("REDIS_ENDPOINT"))?
            .set_override_option("cache.port", env_var("REDIS_PORT"))?
            .set_override_option("cache.local_endpoint", env_var("LOCAL_REDIS_ENDPOINT"))?
            .set_override_option("cache.is_local", env_var("IS_LOCAL").map(|v| is_truthy(&v)))?
            .build()?;

        config.try_deserialize()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.connect_timeout(), Duration::from_secs(2));
        assert_eq!(config.upstream.url, DEFAULT_MAPPING_URL);
        assert_eq!(config.resolver.ordering, OrderingPolicy::Positional);
        assert!(!config.archive.enabled);
    }

    #[test]
    fn test_redis_url_production_endpoint() {
        let cache = CacheSettings {
            endpoint: "figi-cache.abc123.use1.cache.amazonaws.com".to_string(),
            ..Default::default()
        };

        assert_eq!(
            cache.redis_url(),
            "redis://figi-cache.abc123.use1.cache.amazonaws.com:6379"
        );
    }

    #[test]
    fn test_redis_url_local_sandbox() {
        let cache = CacheSettings {
            endpoint: "prod-host".to_string(),
            is_local: true,
            local_endpoint: "127.0.0.1".to_string(),
            port: 6380,
            ..Default::default()
        };

        assert_eq!(cache.redis_url(), "redis://127.0.0.1:6380");
    }

    #[test]
    fn test_require_api_key() {
        let mut upstream = UpstreamSettings::default();
        assert!(matches!(
            upstream.require_api_key(),
            Err(DomainError::Configuration { .. })
        ));

        upstream.api_key = Some("   ".to_string());
        assert!(upstream.require_api_key().is_err());

        upstream.api_key = Some("secret".to_string());
        assert_eq!(upstream.require_api_key().unwrap(), "secret");
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "cache": {"backend": "in_memory", "port": 6390},
            "resolver": {"ordering": "hits_first"}
        }))
        .unwrap();

        assert_eq!(config.cache.backend, CacheBackend::InMemory);
        assert_eq!(config.cache.port, 6390);
        assert_eq!(config.cache.endpoint, "localhost");
        assert_eq!(config.resolver.ordering, OrderingPolicy::HitsFirst);
    }
}
