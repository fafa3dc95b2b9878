//! Provider capability consumed by the purge orchestrator

use crate::error::Result;
use crate::models::{PurgeRequest, SslStatus, Zone};
use async_trait::async_trait;

/// Operations the orchestrator needs from a CDN provider
///
/// Implementations own transport concerns (timeouts, retries, auth). Any
/// `Err` from `purge_cache` means the purge did not happen.
#[async_trait]
pub trait CdnProvider: Send + Sync {
    /// Every zone visible to the configured credentials
    async fn list_zones(&self) -> Result<Vec<Zone>>;

    /// Evict cached content in a zone
    async fn purge_cache(&self, zone_id: &str, request: PurgeRequest) -> Result<()>;

    /// Current SSL setting of a zone
    async fn ssl_status(&self, zone_id: &str) -> Result<SslStatus>;
}
