//! Domain allow-list enforcement
//!
//! Only URLs whose host appears in the configured allow-list are ever handed
//! to the provider.

use crate::config::PurgeConfig;
use crate::host::{normalized_host, strip_port};
use std::collections::HashSet;
use tracing::debug;

/// Set of hosts this installation is permitted to purge
#[derive(Debug, Clone, Default)]
pub struct DomainAllowList {
    domains: HashSet<String>,
}

impl DomainAllowList {
    /// Build an allow-list from explicit domain entries
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| normalize_entry(d.as_ref()))
            .filter(|d| !d.is_empty())
            .collect();
        DomainAllowList { domains }
    }

    /// `allowed_domains` when configured, otherwise the names of the allowed zones
    pub fn from_config(config: &PurgeConfig) -> Self {
        if config.allowed_domains.is_empty() {
            Self::new(config.allowed_zones.iter().map(|z| z.name.as_str()))
        } else {
            Self::new(&config.allowed_domains)
        }
    }

    /// Whether a host (port allowed) is on the list
    pub fn is_allowed(&self, host: &str) -> bool {
        let host = normalize_entry(strip_port(host.trim()));
        !host.is_empty() && self.domains.contains(&host)
    }

    /// Keep the URLs whose host is allowed, in their original order
    pub fn filter_to_allowed_domains<I, S>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        urls.into_iter()
            .map(|url| -> String { url.into() })
            .filter(|url| {
                let host = normalized_host(url);
                let allowed = !host.is_empty() && self.domains.contains(&host);
                if !allowed {
                    debug!("Dropping url={} (host '{}' is not allowed)", url, host);
                }
                allowed
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

fn normalize_entry(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}
