//! Zone resolution against the allowed zone set, plus the cached provider listing

use crate::models::Zone;
use crate::provider::CdnProvider;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Maps hosts to the zone that owns them
///
/// Resolution only ever looks at the configured allowed zones. The provider
/// listing is kept separately for administrative use and is fetched lazily on
/// first use. Population is not atomic: concurrent first callers may each hit
/// the provider, and the last write wins.
pub struct ZoneResolver {
    allowed_zones: Vec<Zone>,
    provider: Arc<dyn CdnProvider>,
    zones_cache: RwLock<Vec<Zone>>,
}

impl ZoneResolver {
    /// Create a resolver over the given allowed zones, in match order
    pub fn new(allowed_zones: Vec<Zone>, provider: Arc<dyn CdnProvider>) -> Self {
        Self {
            allowed_zones,
            provider,
            zones_cache: RwLock::new(Vec::new()),
        }
    }

    pub fn allowed_zones(&self) -> &[Zone] {
        &self.allowed_zones
    }

    /// Replace the allowed zones; the provider listing cache is kept
    pub fn set_allowed_zones(&mut self, allowed_zones: Vec<Zone>) {
        self.allowed_zones = allowed_zones;
    }

    /// First allowed zone whose name is a substring of `host_or_url`, ignoring case
    ///
    /// This is first-match in configuration order, not most-specific: with
    /// both "example.com" and "sub.example.com" configured, whichever is
    /// listed first wins for "sub.example.com".
    pub fn get_zone(&self, host_or_url: &str) -> Option<Zone> {
        let needle = host_or_url.to_ascii_lowercase();
        let zone = self
            .allowed_zones
            .iter()
            .find(|zone| needle.contains(&zone.name.to_ascii_lowercase()))
            .cloned();

        match &zone {
            Some(zone) => debug!("Resolved host={} to zone={} ({})", host_or_url, zone.name, zone.id),
            None => warn!(
                "Could not retrieve the zone from the provider with the domain(url) of {}",
                host_or_url
            ),
        }

        zone
    }

    /// All zones visible to the provider credentials
    ///
    /// Served from cache when non-empty. A failed fetch is logged and yields
    /// an empty list, leaving the cache empty so the next call retries.
    pub async fn list_zones(&self) -> Vec<Zone> {
        {
            let cache = self.zones_cache.read().await;
            if !cache.is_empty() {
                return cache.clone();
            }
        }

        match self.provider.list_zones().await {
            Ok(zones) => {
                info!("Caching {} zones from provider", zones.len());
                *self.zones_cache.write().await = zones.clone();
                zones
            }
            Err(e) => {
                warn!("Failed to list zones from provider: {}", e);
                Vec::new()
            }
        }
    }

    /// Drop the cached provider listing
    pub async fn clear_cache(&self) {
        self.zones_cache.write().await.clear();
    }

    pub async fn cached_zone_count(&self) -> usize {
        self.zones_cache.read().await.len()
    }
}
