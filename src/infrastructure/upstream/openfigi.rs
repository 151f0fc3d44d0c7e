//! OpenFIGI mapping API client

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{UpstreamSettings, DEFAULT_MAPPING_URL};
use crate::domain::upstream::MappingProvider;
use crate::domain::{DomainError, LookupRequest, MappingResult};

/// Header carrying the OpenFIGI API key
pub const API_KEY_HEADER: &str = "X-OPENFIGI-APIKEY";

/// Configuration for the OpenFIGI client
#[derive(Clone)]
pub struct OpenFigiConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl fmt::Debug for OpenFigiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenFigiConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenFigiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_MAPPING_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client config, failing when no API key is configured
    pub fn from_settings(settings: &UpstreamSettings) -> Result<Self, DomainError> {
        let api_key = settings.require_api_key()?;

        Ok(Self::new(api_key)
            .with_url(&settings.url)
            .with_timeout(settings.timeout()))
    }
}

/// Mapping provider backed by `POST /v3/mapping`
#[derive(Debug, Clone)]
pub struct OpenFigiClient {
    client: reqwest::Client,
    config: OpenFigiConfig,
}

impl OpenFigiClient {
    pub fn new(config: OpenFigiConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl MappingProvider for OpenFigiClient {
    async fn resolve(
        &self,
        requests: &[LookupRequest],
    ) -> Result<Vec<MappingResult>, DomainError> {
        debug!(url = %self.config.url, jobs = requests.len(), "Calling OpenFIGI mapping API");

        let response = self
            .client
            .post(&self.config.url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(requests)
            .send()
            .await
            .map_err(|e| DomainError::upstream_transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        debug!(status = status.as_u16(), "OpenFIGI mapping API responded");

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %error_body, "OpenFIGI mapping API call failed");
            return Err(DomainError::upstream_status(status.as_u16(), error_body));
        }

        response
            .json::<Vec<MappingResult>>()
            .await
            .map_err(|e| DomainError::upstream_transport(format!("Failed to parse response: {}", e)))
    }
}
