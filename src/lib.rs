//! CDN Purge
//!
//! Purges cached content on a CDN provider for a set of managed domains.
//!
//! # Overview
//!
//! Callers hand [`PurgeManager`] either a domain ("purge everything") or a set
//! of URLs. The manager drops URLs whose host is not on the configured
//! allow-list, groups the rest by host, resolves each group's zone from the
//! allowed zones and issues one provider call per group. Every unit of work
//! comes back as a [`PurgeOutcome`]; no error crosses the public operations.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cdn_purge::{CloudflareClient, PurgeConfig, PurgeManager};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PurgeConfig::from_file("cdn_purge.yaml")?;
//! let client = CloudflareClient::new(&config.api)?;
//! let manager = PurgeManager::new(Arc::new(config), Arc::new(client));
//!
//! let outcomes = manager
//!     .purge_pages(vec!["https://example.com/index.html", "https://example.com/app.js"])
//!     .await;
//! println!("{}", manager.summarize(&outcomes));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`PurgeManager`]: orchestrates purges and owns the collaborators
//! - [`DomainAllowList`]: filters URLs down to permitted hosts
//! - [`ZoneResolver`]: maps hosts to allowed zones, caches the provider zone listing
//! - [`CdnProvider`]: capability trait for the provider API
//! - [`CloudflareClient`]: reqwest implementation of [`CdnProvider`]
//! - [`PurgeMetrics`]: Prometheus metrics for purge operations
//! - [`report`]: outcome summaries
//!
//! # Configuration
//!
//! Configuration is loaded from a YAML file:
//!
//! ```yaml
//! purge_enabled: true
//! allowed_zones:
//!   - id: "023e105f4ecef8ad9ca31a8372d0c353"
//!     name: "example.com"
//! allowed_domains: ["example.com", "www.example.com"]
//! api:
//!   api_token: "secret"
//!   timeout_secs: 30
//! ```
//!
//! See [`PurgeConfig`] for detailed configuration options.

pub mod allow_list;
pub mod cloudflare;
pub mod config;
pub mod error;
pub mod host;
pub mod models;
pub mod provider;
pub mod purge_manager;
pub mod purge_metrics;
pub mod report;
pub mod zone_resolver;

// Re-export commonly used types
pub use allow_list::DomainAllowList;
pub use cloudflare::CloudflareClient;
pub use config::{ApiConfig, ConfigChanges, PurgeConfig};
pub use error::{PurgeError, Result};
pub use models::{PurgeOutcome, PurgeRequest, SslStatus, Zone};
pub use provider::CdnProvider;
pub use purge_manager::PurgeManager;
pub use purge_metrics::PurgeMetrics;
pub use report::{summarize, PurgeSummary};
pub use zone_resolver::ZoneResolver;
