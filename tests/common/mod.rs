// Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cdn_purge::{
    ApiConfig, CdnProvider, PurgeConfig, PurgeError, PurgeRequest, Result, SslStatus, Zone,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Provider fake that records every call and fails purges for chosen zones
#[derive(Default)]
pub struct RecordingProvider {
    pub zones: Vec<Zone>,
    pub purge_calls: Mutex<Vec<(String, PurgeRequest)>>,
    pub list_calls: AtomicUsize,
    pub ssl_calls: AtomicUsize,
    pub failing_zones: HashSet<String>,
    pub ssl_value: Option<String>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(zone_ids: &[&str]) -> Self {
        Self {
            failing_zones: zone_ids.iter().map(|z| z.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn purge_calls(&self) -> Vec<(String, PurgeRequest)> {
        self.purge_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CdnProvider for RecordingProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.zones.clone())
    }

    async fn purge_cache(&self, zone_id: &str, request: PurgeRequest) -> Result<()> {
        self.purge_calls
            .lock()
            .unwrap()
            .push((zone_id.to_string(), request));

        if self.failing_zones.contains(zone_id) {
            return Err(PurgeError::ApiError {
                code: 1000,
                message: "purge rejected".to_string(),
            });
        }
        Ok(())
    }

    async fn ssl_status(&self, _zone_id: &str) -> Result<SslStatus> {
        self.ssl_calls.fetch_add(1, Ordering::SeqCst);
        match &self.ssl_value {
            Some(value) => Ok(SslStatus::new(value.clone())),
            None => Err(PurgeError::provider_server_error(500, "ssl lookup failed")),
        }
    }
}

/// Enabled config allowing a.com, b.com, example.com and www.example.com
pub fn enabled_config() -> PurgeConfig {
    PurgeConfig {
        purge_enabled: true,
        allowed_zones: vec![
            Zone::new("zone-a", "a.com"),
            Zone::new("zone-b", "b.com"),
            Zone::new("zone-example", "example.com"),
        ],
        allowed_domains: vec![
            "a.com".to_string(),
            "b.com".to_string(),
            "example.com".to_string(),
            "www.example.com".to_string(),
        ],
        api: ApiConfig {
            api_token: Some("test-token".to_string()),
            ..Default::default()
        },
        metrics_enabled: false,
    }
}
