//! Purge orchestration
//!
//! [`PurgeManager`] is the entry point for callers. It enforces the feature
//! flag and the domain allow-list, groups URLs by host so each host costs one
//! provider call, resolves the owning zone and turns every unit of work into a
//! [`PurgeOutcome`]. No error escapes its public operations.

use crate::allow_list::DomainAllowList;
use crate::config::{ConfigChanges, PurgeConfig};
use crate::error::Result;
use crate::host::{extract_host, strip_port};
use crate::models::{PurgeOutcome, PurgeRequest, Zone};
use crate::provider::CdnProvider;
use crate::purge_metrics::PurgeMetrics;
use crate::report::summarize;
use crate::zone_resolver::ZoneResolver;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const OP_EVERYTHING: &str = "everything";
const OP_PAGES: &str = "pages";

/// Orchestrates purges against a [`CdnProvider`]
pub struct PurgeManager {
    config: Arc<PurgeConfig>,
    allow_list: DomainAllowList,
    resolver: ZoneResolver,
    provider: Arc<dyn CdnProvider>,
    metrics: Option<Arc<PurgeMetrics>>,
}

impl PurgeManager {
    /// Create a manager from configuration and a provider
    pub fn new(config: Arc<PurgeConfig>, provider: Arc<dyn CdnProvider>) -> Self {
        let allow_list = DomainAllowList::from_config(&config);
        let resolver = ZoneResolver::new(config.allowed_zones.clone(), provider.clone());

        Self {
            config,
            allow_list,
            resolver,
            provider,
            metrics: None,
        }
    }

    /// Enable Prometheus metrics
    pub fn with_metrics(mut self, metrics: Arc<PurgeMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &PurgeConfig {
        &self.config
    }

    pub fn allow_list(&self) -> &DomainAllowList {
        &self.allow_list
    }

    pub fn resolver(&self) -> &ZoneResolver {
        &self.resolver
    }

    /// Apply a new configuration without rebuilding the manager
    ///
    /// The allow-list and the allowed zones are rebuilt from the merged
    /// configuration. When the API settings change the cached provider zone
    /// listing is dropped; the provider itself keeps its credentials until
    /// replaced with [`PurgeManager::set_provider`].
    pub async fn apply_config(&mut self, new_config: &PurgeConfig) -> Result<ConfigChanges> {
        let mut config = (*self.config).clone();
        let changes = config.update_from(new_config)?;

        if !changes.has_changes() {
            debug!("Configuration unchanged");
            return Ok(changes);
        }

        info!("Applying configuration changes: {}", changes.summary().join(", "));

        self.allow_list = DomainAllowList::from_config(&config);
        if changes.allowed_zones_changed {
            self.resolver.set_allowed_zones(config.allowed_zones.clone());
        }
        if changes.requires_cache_clear() {
            let dropped = self.resolver.cached_zone_count().await;
            self.resolver.clear_cache().await;
            warn!(
                "API settings changed, dropped {} cached zones; replace the provider to use new credentials",
                dropped
            );
        }

        self.config = Arc::new(config);
        Ok(changes)
    }

    /// Load a configuration file and apply it with [`PurgeManager::apply_config`]
    pub async fn reload_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ConfigChanges> {
        let new_config = PurgeConfig::from_file(path)?;
        self.apply_config(&new_config).await
    }

    /// Swap the provider, starting from an empty zone listing cache
    pub fn set_provider(&mut self, provider: Arc<dyn CdnProvider>) {
        self.resolver = ZoneResolver::new(self.config.allowed_zones.clone(), provider.clone());
        self.provider = provider;
    }

    /// Purge every cached asset of the zone owning `domain`
    ///
    /// `domain` may be a bare host or a full URL; only its authority is used
    /// for zone matching.
    pub async fn purge_everything(&self, domain: &str) -> PurgeOutcome {
        let start_time = Instant::now();
        self.record(|m| m.record_request(OP_EVERYTHING));

        let outcome = self.purge_everything_inner(domain).await;

        self.record(|m| {
            m.record_result(OP_EVERYTHING, outcome.succeeded);
            m.record_duration(OP_EVERYTHING, start_time.elapsed().as_secs_f64());
        });
        outcome
    }

    async fn purge_everything_inner(&self, domain: &str) -> PurgeOutcome {
        if !self.config.purge_enabled {
            debug!("Purge everything for {} skipped, purging is disabled", domain);
            return PurgeOutcome::disabled();
        }

        let domain = extract_host(domain);

        let zone = match self.resolver.get_zone(&domain) {
            Some(zone) => zone,
            None => return PurgeOutcome::invalid_domain(&domain),
        };

        info!("Purging everything in zone={} ({}) for domain={}", zone.name, zone.id, domain);
        match self.provider.purge_cache(&zone.id, PurgeRequest::Everything).await {
            Ok(()) => {
                self.record(|m| m.record_provider_call(OP_EVERYTHING, true));
                PurgeOutcome::success("")
            }
            Err(e) => {
                warn!(
                    "Failed to purge everything in zone={}: {} (transient={})",
                    zone.id,
                    e,
                    e.is_transient()
                );
                self.record(|m| m.record_provider_call(OP_EVERYTHING, false));
                PurgeOutcome::api_error()
            }
        }
    }

    /// Purge a set of URLs
    ///
    /// URLs outside the allow-list are dropped. The rest are grouped by host
    /// (not by zone, so two hosts in one zone still cost two provider calls)
    /// and each group is purged with a single call, one group at a time.
    ///
    /// # Returns
    /// * One success per URL of every group the provider accepted
    /// * One failure per group that could not be resolved or was rejected
    /// * A single disabled failure when purging is switched off
    pub async fn purge_pages<I, S>(&self, urls: I) -> Vec<PurgeOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let start_time = Instant::now();
        self.record(|m| m.record_request(OP_PAGES));

        let outcomes = self.purge_pages_inner(urls).await;

        self.record(|m| {
            for outcome in &outcomes {
                m.record_result(OP_PAGES, outcome.succeeded);
            }
            m.record_duration(OP_PAGES, start_time.elapsed().as_secs_f64());
        });
        outcomes
    }

    async fn purge_pages_inner<I, S>(&self, urls: I) -> Vec<PurgeOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.config.purge_enabled {
            debug!("Purge pages skipped, purging is disabled");
            return vec![PurgeOutcome::disabled()];
        }

        let urls = self.allow_list.filter_to_allowed_domains(urls);
        self.record(|m| m.record_urls(OP_PAGES, urls.len()));

        let mut outcomes = Vec::with_capacity(urls.len());

        for (host, group) in group_by_host(urls) {
            let dns_host = strip_port(&host);

            let zone = match self.resolver.get_zone(dns_host) {
                Some(zone) => zone,
                None => {
                    outcomes.push(PurgeOutcome::unresolved_zone(&host));
                    continue;
                }
            };

            outcomes.extend(self.purge_group(&zone, &host, group).await);
        }

        outcomes
    }

    async fn purge_group(&self, zone: &Zone, host: &str, urls: Vec<String>) -> Vec<PurgeOutcome> {
        info!(
            "Purging {} urls for host={} in zone={} ({})",
            urls.len(),
            host,
            zone.name,
            zone.id
        );

        match self
            .provider
            .purge_cache(&zone.id, PurgeRequest::Files(urls.clone()))
            .await
        {
            Ok(()) => {
                self.record(|m| m.record_provider_call(OP_PAGES, true));
                urls.iter().map(|url| PurgeOutcome::purged_url(url)).collect()
            }
            Err(e) => {
                warn!(
                    "Failed to purge {} urls for host={}: {} (transient={})",
                    urls.len(),
                    host,
                    e,
                    e.is_transient()
                );
                self.record(|m| m.record_provider_call(OP_PAGES, false));
                vec![PurgeOutcome::api_error()]
            }
        }
    }

    /// Whether SSL is enabled for a zone
    ///
    /// Always a live provider call. A provider error is logged and reported as
    /// `false`.
    pub async fn is_ssl_enabled(&self, zone_id: &str) -> bool {
        match self.provider.ssl_status(zone_id).await {
            Ok(status) => status.is_enabled(),
            Err(e) => {
                warn!(
                    "Failed to read SSL status for zone={}: {} (transient={})",
                    zone_id,
                    e,
                    e.is_transient()
                );
                false
            }
        }
    }

    /// Every zone visible to the provider credentials (cached)
    pub async fn list_zones(&self) -> Vec<Zone> {
        self.resolver.list_zones().await
    }

    pub async fn clear_zone_cache(&self) {
        self.resolver.clear_cache().await;
    }

    /// First allowed zone matching `host_or_url`
    pub fn get_zone(&self, host_or_url: &str) -> Option<Zone> {
        self.resolver.get_zone(host_or_url)
    }

    pub fn summarize(&self, outcomes: &[PurgeOutcome]) -> String {
        summarize(outcomes)
    }

    fn record<F: FnOnce(&PurgeMetrics)>(&self, f: F) {
        if let Some(metrics) = &self.metrics {
            f(metrics);
        }
    }
}

/// Group URLs by authority, keeping first-seen host order and URL order
fn group_by_host(urls: Vec<String>) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for url in urls {
        let host = extract_host(&url);
        match index.get(&host) {
            Some(&i) => groups[i].1.push(url),
            None => {
                index.insert(host.clone(), groups.len());
                groups.push((host, vec![url]));
            }
        }
    }

    groups
}
