//! CDN Purge command line driver
//!
//! Loads configuration, sets up logging and runs a single purge operation.

use cdn_purge::{CloudflareClient, PurgeConfig, PurgeManager, PurgeMetrics, PurgeSummary};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

const USAGE: &str = "\
Usage:
  cdn-purge <config.yaml> everything <domain>
  cdn-purge <config.yaml> pages <url>...
  cdn-purge <config.yaml> zones
  cdn-purge <config.yaml> ssl <zone-id>";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    }

    match run(&args[0], &args[1], &args[2..]).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run one command, returning whether it fully succeeded
async fn run(config_path: &str, command: &str, rest: &[String]) -> anyhow::Result<bool> {
    info!("Loading configuration from: {}", config_path);
    let config = PurgeConfig::from_file(config_path)?;
    info!("  - Purge enabled: {}", config.purge_enabled);
    info!("  - Allowed zones: {}", config.allowed_zones.len());
    info!("  - API endpoint: {}", config.api.base_url);

    let client = CloudflareClient::new(&config.api)?;
    let metrics_enabled = config.metrics_enabled;
    let mut manager = PurgeManager::new(Arc::new(config), Arc::new(client));

    if metrics_enabled {
        match PurgeMetrics::new() {
            Ok(metrics) => manager = manager.with_metrics(Arc::new(metrics)),
            Err(e) => warn!("Purge metrics disabled: {}", e),
        }
    }

    match (command, rest) {
        ("everything", [domain]) => {
            let outcomes = vec![manager.purge_everything(domain).await];
            print!("{}", manager.summarize(&outcomes));
            Ok(PurgeSummary::from_outcomes(&outcomes).all_succeeded())
        }
        ("pages", urls) if !urls.is_empty() => {
            let outcomes = manager.purge_pages(urls.iter().cloned()).await;
            print!("{}", manager.summarize(&outcomes));
            Ok(PurgeSummary::from_outcomes(&outcomes).all_succeeded())
        }
        ("zones", []) => {
            let zones = manager.list_zones().await;
            for zone in &zones {
                println!("{}\t{}", zone.id, zone.name);
            }
            Ok(!zones.is_empty())
        }
        ("ssl", [zone_id]) => {
            let enabled = manager.is_ssl_enabled(zone_id).await;
            println!("ssl {}", if enabled { "enabled" } else { "disabled" });
            Ok(true)
        }
        _ => anyhow::bail!("invalid arguments\n{}", USAGE),
    }
}
