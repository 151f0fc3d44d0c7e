//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ArchiveSettings, CacheBackend, CacheSettings, LogFormat, LoggingConfig,
    MetricsSettings, ResolverSettings, ServerConfig, UpstreamSettings, DEFAULT_MAPPING_URL,
};
