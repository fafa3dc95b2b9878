//! Configuration management for the CDN purge crate

use crate::error::{PurgeError, Result};
use crate::models::Zone;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Configuration for purge orchestration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeConfig {
    /// Whether purging is switched on (default: false)
    #[serde(default)]
    pub purge_enabled: bool,

    /// Zones this installation may purge, in match order
    #[serde(default)]
    pub allowed_zones: Vec<Zone>,

    /// Hosts whose URLs may be purged
    /// When empty, the allowed zone names are used instead
    #[serde(default)]
    pub allowed_domains: Vec<String>,

    /// Provider API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Whether to record Prometheus metrics for purge operations (default: true)
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

/// Connection and credential settings for the provider API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the v4 API (default: https://api.cloudflare.com/client/v4)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Scoped API token, sent as a bearer token
    #[serde(default)]
    pub api_token: Option<String>,

    /// Global API key, used together with `email`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Account email for the global API key
    #[serde(default)]
    pub email: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            api_key: None,
            email: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Validate the API configuration
    ///
    /// # Validation Rules
    /// - base_url must be an http(s) URL
    /// - timeout_secs must be > 0
    /// - either api_token, or both api_key and email, must be set
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(PurgeError::ConfigError(format!(
                "api base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(PurgeError::ConfigError(
                "api timeout_secs must be greater than 0".to_string(),
            ));
        }

        let has_token = self.api_token.as_deref().is_some_and(|t| !t.is_empty());
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            && self.email.as_deref().is_some_and(|e| !e.is_empty());

        if !has_token && !has_key {
            return Err(PurgeError::ConfigError(
                "api credentials require either api_token or both api_key and email".to_string(),
            ));
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for PurgeConfig {
    fn default() -> Self {
        PurgeConfig {
            purge_enabled: false,
            allowed_zones: Vec::new(),
            allowed_domains: Vec::new(),
            api: ApiConfig::default(),
            metrics_enabled: default_true(),
        }
    }
}

impl PurgeConfig {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Returns
    /// * `Ok(PurgeConfig)` if loading and validation succeed
    /// * `Err(PurgeError)` if file cannot be read or config is invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            PurgeError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: PurgeConfig = serde_yaml::from_str(content).map_err(|e| {
            PurgeError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Validation Rules
    /// - api settings must be valid (see [`ApiConfig::validate`])
    /// - every allowed zone needs a non-empty id and name
    /// - zone ids must be unique
    /// - allowed_zones must not be empty while purging is enabled
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;

        let mut seen_ids = HashSet::new();
        for zone in &self.allowed_zones {
            if zone.id.trim().is_empty() || zone.name.trim().is_empty() {
                return Err(PurgeError::ConfigError(format!(
                    "allowed zone entries need both id and name, got id='{}' name='{}'",
                    zone.id, zone.name
                )));
            }
            if !seen_ids.insert(zone.id.as_str()) {
                return Err(PurgeError::ConfigError(format!(
                    "duplicate allowed zone id '{}'",
                    zone.id
                )));
            }
        }

        if self.purge_enabled && self.allowed_zones.is_empty() {
            return Err(PurgeError::ConfigError(
                "allowed_zones must not be empty when purge_enabled is true".to_string(),
            ));
        }

        if self.allowed_domains.iter().any(|d| d.trim().is_empty()) {
            return Err(PurgeError::ConfigError(
                "allowed_domains must not contain empty entries".to_string(),
            ));
        }

        Ok(())
    }

    /// Update configuration from another config
    ///
    /// The new configuration is validated first; on error nothing is applied.
    ///
    /// # Returns
    /// * `Ok(ConfigChanges)` - Description of what changed
    /// * `Err(PurgeError)` - If the new configuration is invalid
    pub fn update_from(&mut self, new_config: &PurgeConfig) -> Result<ConfigChanges> {
        new_config.validate()?;

        let mut changes = ConfigChanges::default();

        if self.purge_enabled != new_config.purge_enabled {
            changes.purge_enabled_changed = true;
            self.purge_enabled = new_config.purge_enabled;
        }

        if self.allowed_zones != new_config.allowed_zones {
            changes.allowed_zones_changed = true;
            self.allowed_zones = new_config.allowed_zones.clone();
        }

        if self.allowed_domains != new_config.allowed_domains {
            changes.allowed_domains_changed = true;
            self.allowed_domains = new_config.allowed_domains.clone();
        }

        if self.api != new_config.api {
            changes.api_changed = true;
            self.api = new_config.api.clone();
        }

        if self.metrics_enabled != new_config.metrics_enabled {
            changes.metrics_enabled_changed = true;
            self.metrics_enabled = new_config.metrics_enabled;
        }

        Ok(changes)
    }

    /// Reload configuration from file and apply changes
    pub fn reload_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ConfigChanges> {
        let new_config = Self::from_file(path)?;
        self.update_from(&new_config)
    }
}

/// Description of configuration changes after hot reload
#[derive(Debug, Default, Clone)]
pub struct ConfigChanges {
    pub purge_enabled_changed: bool,
    pub allowed_zones_changed: bool,
    pub allowed_domains_changed: bool,
    pub api_changed: bool,
    pub metrics_enabled_changed: bool,
}

impl ConfigChanges {
    /// Check if any changes were made
    pub fn has_changes(&self) -> bool {
        self.purge_enabled_changed
            || self.allowed_zones_changed
            || self.allowed_domains_changed
            || self.api_changed
            || self.metrics_enabled_changed
    }

    /// Check if the cached provider zone listing is stale (new account or endpoint)
    pub fn requires_cache_clear(&self) -> bool {
        self.api_changed
    }

    /// Get a summary of changes
    pub fn summary(&self) -> Vec<String> {
        let mut changes = Vec::new();

        if self.purge_enabled_changed {
            changes.push("purge_enabled".to_string());
        }
        if self.allowed_zones_changed {
            changes.push("allowed_zones".to_string());
        }
        if self.allowed_domains_changed {
            changes.push("allowed_domains".to_string());
        }
        if self.api_changed {
            changes.push("api".to_string());
        }
        if self.metrics_enabled_changed {
            changes.push("metrics_enabled".to_string());
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> PurgeConfig {
        PurgeConfig {
            purge_enabled: true,
            allowed_zones: vec![Zone::new("zone-1", "example.com")],
            api: ApiConfig {
                api_token: Some("token".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = PurgeConfig::default();
        assert!(!config.purge_enabled);
        assert!(config.allowed_zones.is_empty());
        assert!(config.metrics_enabled);
        assert_eq!(config.api.base_url, "https://api.cloudflare.com/client/v4");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_default_config_needs_credentials() {
        let config = PurgeConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_key_and_email() {
        let mut config = valid_config();
        config.api.api_token = None;
        config.api.api_key = Some("key".to_string());
        assert!(config.validate().is_err());

        config.api.email = Some("ops@example.com".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = valid_config();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = valid_config();
        config.api.base_url = "api.cloudflare.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_enabled_without_zones() {
        let mut config = valid_config();
        config.allowed_zones.clear();
        assert!(config.validate().is_err());

        config.purge_enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zone_entries() {
        let mut config = valid_config();
        config.allowed_zones.push(Zone::new("", "other.com"));
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.allowed_zones.push(Zone::new("zone-1", "other.com"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
purge_enabled: true
allowed_zones:
  - id: "zone-1"
    name: "example.com"
allowed_domains: ["example.com", "www.example.com"]
api:
  api_key: "key"
  email: "ops@example.com"
"#;
        let config = PurgeConfig::from_yaml(yaml).unwrap();
        assert!(config.purge_enabled);
        assert_eq!(config.allowed_zones.len(), 1);
        assert_eq!(config.allowed_domains.len(), 2);
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_config_hot_reload() {
        let mut config = valid_config();
        let mut new_config = valid_config();

        let changes = config.update_from(&new_config).unwrap();
        assert!(!changes.has_changes());

        new_config.purge_enabled = false;
        let changes = config.update_from(&new_config).unwrap();
        assert!(changes.purge_enabled_changed);
        assert!(!changes.requires_cache_clear());
        assert!(!config.purge_enabled);

        new_config.api.api_token = Some("rotated".to_string());
        let changes = config.update_from(&new_config).unwrap();
        assert!(changes.api_changed);
        assert!(changes.requires_cache_clear());
        assert_eq!(changes.summary(), vec!["api".to_string()]);
    }

    #[test]
    fn test_config_hot_reload_validation() {
        let mut config = valid_config();
        let mut new_config = valid_config();
        new_config.api.timeout_secs = 0;

        assert!(config.update_from(&new_config).is_err());
        assert_eq!(config.api.timeout_secs, 30);
    }
}
