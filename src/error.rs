//! Error types for the CDN purge crate

use thiserror::Error;

/// Result type alias for purge operations
pub type Result<T> = std::result::Result<T, PurgeError>;

/// Error types that can occur while loading configuration or talking to the provider
#[derive(Error, Debug, Clone)]
pub enum PurgeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Network timeout: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Provider API error {code}: {message}")]
    ApiError { code: i64, message: String },

    #[error("Provider returned 4xx error: {status} - {message}")]
    ProviderClientError { status: u16, message: String },

    #[error("Provider returned 5xx error: {status} - {message}")]
    ProviderServerError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for PurgeError {
    fn from(err: std::io::Error) -> Self {
        PurgeError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for PurgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PurgeError::Timeout(err.to_string())
        } else if err.is_decode() {
            PurgeError::ParseError(err.to_string())
        } else {
            PurgeError::HttpError(err.to_string())
        }
    }
}

impl PurgeError {
    /// Whether a later attempt at the same call could reasonably succeed
    ///
    /// Transient:
    /// - 5xx responses from the provider
    /// - Network timeouts and transport errors
    ///
    /// Permanent:
    /// - 4xx responses (bad credentials, unknown zone)
    /// - Envelope errors reported by the API itself
    /// - Configuration and parse errors
    pub fn is_transient(&self) -> bool {
        match self {
            PurgeError::ProviderServerError { .. } => true,
            PurgeError::Timeout(_) => true,
            PurgeError::HttpError(_) => true,
            PurgeError::IoError(_) => true,

            PurgeError::ProviderClientError { .. } => false,
            PurgeError::ApiError { .. } => false,
            PurgeError::ConfigError(_) => false,
            PurgeError::ParseError(_) => false,
        }
    }

    /// Create a ProviderClientError from a status code and message
    pub fn provider_client_error(status: u16, message: impl Into<String>) -> Self {
        PurgeError::ProviderClientError {
            status,
            message: message.into(),
        }
    }

    /// Create a ProviderServerError from a status code and message
    pub fn provider_server_error(status: u16, message: impl Into<String>) -> Self {
        PurgeError::ProviderServerError {
            status,
            message: message.into(),
        }
    }

    /// Create an error from an HTTP status code
    ///
    /// Automatically categorizes as 4xx or 5xx error
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if (400..500).contains(&status) {
            PurgeError::provider_client_error(status, message)
        } else if (500..600).contains(&status) {
            PurgeError::provider_server_error(status, message)
        } else {
            PurgeError::HttpError(format!("HTTP {}: {}", status, message))
        }
    }
}
