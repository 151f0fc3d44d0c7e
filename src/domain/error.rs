use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("Cache unavailable: {message}")]
    CacheUnavailable { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Deserialization error for key '{key}': {message}")]
    Deserialization { key: String, message: String },

    #[error("Upstream error{}: {message}", status_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    pub fn cache_unavailable(message: impl Into<String>) -> Self {
        Self::CacheUnavailable {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn deserialization(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialization {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Upstream failure with the HTTP status the service answered with
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Upstream failure before any status was received (connect, timeout, body)
    pub fn upstream_transport(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
