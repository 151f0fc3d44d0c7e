//! Serverless gateway event envelope
//!
//! Functions behind an API gateway receive `{httpMethod, body, pathParameters}`
//! and answer `{isBase64Encoded, statusCode, body}` with a string body. These
//! handlers expose the mapping and cache administration operations in that
//! shape.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::types::ApiError;
use crate::domain::{DomainError, LookupRequest};
use crate::infrastructure::services::{BatchResolver, CacheAdminService};

/// Incoming gateway event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub path_parameters: Option<PathParameters>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathParameters {
    #[serde(default)]
    pub key: Option<String>,
}

impl GatewayEvent {
    pub fn new(http_method: impl Into<String>) -> Self {
        Self {
            http_method: Some(http_method.into()),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.path_parameters = Some(PathParameters {
            key: Some(key.into()),
        });
        self
    }

    fn key(&self) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.key.as_deref())
            .filter(|key| !key.is_empty())
    }
}

/// Gateway response with a string body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub is_base64_encoded: bool,
    pub status_code: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            is_base64_encoded: false,
            status_code,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(400, body)
    }
}

impl From<DomainError> for GatewayResponse {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        let status = ApiError::from(err).status.as_u16();
        Self::new(status, message)
    }
}

/// Mapping function: the body is a JSON array of lookups
pub async fn handle_mapping_event(resolver: &BatchResolver, event: &GatewayEvent) -> GatewayResponse {
    if !event
        .http_method
        .as_deref()
        .is_some_and(|method| method.eq_ignore_ascii_case("POST"))
    {
        warn!(method = ?event.http_method, "Rejected mapping event with unsupported method");
        return GatewayResponse::bad_request("Invalid request");
    }

    let Some(body) = event.body.as_deref() else {
        return GatewayResponse::bad_request("Missing request body");
    };

    let batch: Vec<LookupRequest> = match serde_json::from_str(body) {
        Ok(batch) => batch,
        Err(e) => {
            warn!(error = %e, "Rejected mapping event with invalid body");
            return GatewayResponse::bad_request(format!("Invalid request body: {}", e));
        }
    };

    let outcome = match resolver.resolve(&batch).await {
        Ok(outcome) => outcome,
        Err(e) => return e.into(),
    };

    match serde_json::to_string(&outcome.items) {
        Ok(body) => GatewayResponse::ok(body),
        Err(e) => DomainError::internal(format!("Failed to serialize response: {}", e)).into(),
    }
}

/// Cache administration function, dispatched on method and `key` path parameter
pub async fn handle_admin_event(admin: &CacheAdminService, event: &GatewayEvent) -> GatewayResponse {
    let method = event.http_method.as_deref().map(str::to_ascii_uppercase);
    let key = event.key();
    debug!(method = ?method, key = ?key, "Handling cache admin event");

    let result = match (method.as_deref(), key) {
        (Some("GET"), Some(key)) => admin.get_key(key).await,
        (Some("GET"), None) => admin.list_keys().await.and_then(to_json),
        (Some("DELETE"), Some(key)) => admin.delete_key(key).await.map(|n| n.to_string()),
        (Some("DELETE"), None) => admin.flush().await.map(|_| "true".to_string()),
        _ => return GatewayResponse::bad_request("Invalid request"),
    };

    match result {
        Ok(body) => GatewayResponse::ok(body),
        Err(e) => e.into(),
    }
}

fn to_json<T: Serialize>(value: T) -> Result<String, DomainError> {
    serde_json::to_string(&value)
        .map_err(|e| DomainError::internal(format!("Failed to serialize response: {}", e)))
}
