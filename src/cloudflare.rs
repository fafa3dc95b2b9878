//! Cloudflare v4 API client implementing [`CdnProvider`]

use crate::config::ApiConfig;
use crate::error::{PurgeError, Result};
use crate::models::{ApiResponse, PurgeCacheBody, PurgeRequest, SslStatus, Zone};
use crate::provider::CdnProvider;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Page size used when listing zones
const ZONES_PER_PAGE: u32 = 50;

/// Credentials sent with every request
#[derive(Debug, Clone)]
enum Credentials {
    Token(String),
    KeyAndEmail { key: String, email: String },
}

/// HTTP client for the Cloudflare v4 API
pub struct CloudflareClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl CloudflareClient {
    /// Create a client from validated API settings
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;

        let credentials = match (&config.api_token, &config.api_key, &config.email) {
            (Some(token), _, _) if !token.is_empty() => Credentials::Token(token.clone()),
            (_, Some(key), Some(email)) => Credentials::KeyAndEmail {
                key: key.clone(),
                email: email.clone(),
            },
            _ => {
                return Err(PurgeError::ConfigError(
                    "missing api credentials".to_string(),
                ))
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PurgeError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(CloudflareClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Token(token) => request.bearer_auth(token),
            Credentials::KeyAndEmail { key, email } => request
                .header("X-Auth-Key", key)
                .header("X-Auth-Email", email),
        }
    }

    /// Send a request and unwrap the v4 envelope
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<ApiResponse<T>> {
        let response = self.authorize(request).send().await.map_err(|e| {
            warn!("{} request failed: {}", what, e);
            PurgeError::from(e)
        })?;

        let response = check_status(response, what).await?;

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            warn!("{} returned an unreadable body: {}", what, e);
            PurgeError::ParseError(format!("Invalid {} response: {}", what, e))
        })?;

        if !envelope.success {
            let (code, message) = envelope
                .errors
                .first()
                .map(|e| (e.code, e.message.clone()))
                .unwrap_or((0, "unknown error".to_string()));
            warn!("{} rejected by API: code={} message={}", what, code, message);
            return Err(PurgeError::ApiError { code, message });
        }

        Ok(envelope)
    }
}

/// Turn non-2xx statuses into errors, pulling the first envelope error if present
async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
        .ok()
        .and_then(|envelope| envelope.errors.into_iter().next())
        .map(|e| format!("{} ({})", e.message, e.code))
        .unwrap_or_else(|| status.to_string());

    warn!("{} returned status={}: {}", what, status, message);
    Err(PurgeError::from_http_status(status.as_u16(), message))
}

#[async_trait]
impl CdnProvider for CloudflareClient {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let mut zones = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!("{}/zones", self.base_url);
            let request = self.client.get(&url).query(&[
                ("page", page.to_string()),
                ("per_page", ZONES_PER_PAGE.to_string()),
            ]);

            let envelope: ApiResponse<Vec<Zone>> = self.execute(request, "list zones").await?;
            let batch = envelope.result.unwrap_or_default();
            debug!("Fetched zone page={} count={}", page, batch.len());
            let batch_len = batch.len();
            zones.extend(batch);

            let total_pages = envelope.result_info.map(|info| info.total_pages).unwrap_or(1);
            if page >= total_pages || batch_len == 0 {
                break;
            }
            page += 1;
        }

        info!("Listed {} zones from provider", zones.len());
        Ok(zones)
    }

    async fn purge_cache(&self, zone_id: &str, request: PurgeRequest) -> Result<()> {
        let url = format!("{}/zones/{}/purge_cache", self.base_url, zone_id);
        let body = PurgeCacheBody::from(&request);

        debug!(
            "Purging zone={} urls={} everything={}",
            zone_id,
            request.url_count(),
            request == PurgeRequest::Everything
        );

        let _: ApiResponse<serde_json::Value> = self
            .execute(self.client.post(&url).json(&body), "purge cache")
            .await?;

        Ok(())
    }

    async fn ssl_status(&self, zone_id: &str) -> Result<SslStatus> {
        let url = format!("{}/zones/{}/settings/ssl", self.base_url, zone_id);

        let envelope: ApiResponse<SslStatus> =
            self.execute(self.client.get(&url), "ssl status").await?;

        envelope.result.ok_or_else(|| {
            PurgeError::ParseError("ssl status response had no result".to_string())
        })
    }
}
