//! Core data models for the CDN purge crate

use serde::{Deserialize, Serialize};

/// Message returned when purging is switched off in the configuration
pub const DISABLED_MESSAGE: &str = "CDN purging is turned off in the configuration";

/// Message returned when the provider rejects or fails a purge call
pub const API_ERROR_MESSAGE: &str =
    "The CDN API returned an error while purging, check the logs for details";

/// SSL setting value the provider reports when SSL is disabled for a zone
pub const SSL_DISABLED_VALUE: &str = "off";

/// A CDN-managed domain grouping
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    /// Opaque provider identifier
    pub id: String,
    /// Domain name of the zone (e.g. "example.com")
    pub name: String,
}

impl Zone {
    /// Create a new Zone
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Zone {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Result of one unit of purge work (a domain, a URL or a host group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeOutcome {
    pub succeeded: bool,
    /// Human-readable detail, empty on unqualified success
    pub message: String,
}

impl PurgeOutcome {
    /// Create a successful outcome
    pub fn success(message: impl Into<String>) -> Self {
        PurgeOutcome {
            succeeded: true,
            message: message.into(),
        }
    }

    /// Create a failed outcome
    pub fn failure(message: impl Into<String>) -> Self {
        PurgeOutcome {
            succeeded: false,
            message: message.into(),
        }
    }

    pub fn disabled() -> Self {
        Self::failure(DISABLED_MESSAGE)
    }

    pub fn api_error() -> Self {
        Self::failure(API_ERROR_MESSAGE)
    }

    /// Failure for a domain that does not belong to any allowed zone
    pub fn invalid_domain(domain: &str) -> Self {
        Self::failure(format!(
            "We could not purge the cache because the domain {} is not valid with the provided api key and email combo. \
             Please ensure this domain is registered under these credentials on your CDN dashboard.",
            domain
        ))
    }

    /// Failure for a host group whose zone could not be resolved
    pub fn unresolved_zone(host: &str) -> Self {
        Self::failure(format!(
            "Could not retrieve the zone from the provider with the domain(url) of {}",
            host
        ))
    }

    pub fn purged_url(url: &str) -> Self {
        Self::success(format!("Purged for url {}", url))
    }
}

/// What a single purge call should evict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeRequest {
    /// Every cached asset in the zone
    Everything,
    /// Only the listed URLs
    Files(Vec<String>),
}

impl PurgeRequest {
    /// Number of URLs carried by the request (0 for a full purge)
    pub fn url_count(&self) -> usize {
        match self {
            PurgeRequest::Everything => 0,
            PurgeRequest::Files(files) => files.len(),
        }
    }
}

/// SSL setting of a zone as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslStatus {
    /// Setting identifier, "ssl" for Cloudflare
    #[serde(default)]
    pub id: String,
    /// "off", "flexible", "full" or "strict"
    pub value: String,
}

impl SslStatus {
    pub fn new(value: impl Into<String>) -> Self {
        SslStatus {
            id: "ssl".to_string(),
            value: value.into(),
        }
    }

    /// True unless the value is exactly the disabled sentinel
    pub fn is_enabled(&self) -> bool {
        self.value != SSL_DISABLED_VALUE
    }
}

/// Error entry in a v4 API envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Pagination block of a v4 API list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_count: u32,
}

/// Standard v4 API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    pub result: Option<T>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// Body of a purge_cache call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PurgeCacheBody {
    Everything { purge_everything: bool },
    Files { files: Vec<String> },
}

impl From<&PurgeRequest> for PurgeCacheBody {
    fn from(request: &PurgeRequest) -> Self {
        match request {
            PurgeRequest::Everything => PurgeCacheBody::Everything {
                purge_everything: true,
            },
            PurgeRequest::Files(files) => PurgeCacheBody::Files {
                files: files.clone(),
            },
        }
    }
}
