//! Prometheus metrics for purge operations

use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramOpts, HistogramVec, Opts,
    Registry,
};
use std::sync::Arc;

const DURATION_BUCKETS: &[f64] = &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Metrics for purge operations
#[derive(Clone)]
pub struct PurgeMetrics {
    /// Purge operations started, by operation (everything, pages)
    pub purge_requests_total: Arc<CounterVec>,

    /// Outcomes produced, by operation and result (success, failure)
    pub purge_results_total: Arc<CounterVec>,

    /// URLs submitted for purging
    pub purge_urls_total: Arc<CounterVec>,

    /// Calls made to the provider, by operation and result
    pub provider_calls_total: Arc<CounterVec>,

    /// Wall time of whole purge operations
    pub purge_duration_seconds: Arc<HistogramVec>,
}

impl PurgeMetrics {
    /// Create metrics registered in the default registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let purge_requests_total = register_counter_vec!(
            "cdn_purge_requests_total",
            "Total number of purge operations",
            &["operation"]
        )?;

        let purge_results_total = register_counter_vec!(
            "cdn_purge_results_total",
            "Total number of purge outcomes by result",
            &["operation", "result"]
        )?;

        let purge_urls_total = register_counter_vec!(
            "cdn_purge_urls_total",
            "Total number of URLs submitted for purging",
            &["operation"]
        )?;

        let provider_calls_total = register_counter_vec!(
            "cdn_purge_provider_calls_total",
            "Total number of purge calls made to the CDN provider",
            &["operation", "result"]
        )?;

        let purge_duration_seconds = register_histogram_vec!(
            "cdn_purge_duration_seconds",
            "Duration of purge operations in seconds",
            &["operation"],
            DURATION_BUCKETS.to_vec()
        )?;

        Ok(Self {
            purge_requests_total: Arc::new(purge_requests_total),
            purge_results_total: Arc::new(purge_results_total),
            purge_urls_total: Arc::new(purge_urls_total),
            provider_calls_total: Arc::new(provider_calls_total),
            purge_duration_seconds: Arc::new(purge_duration_seconds),
        })
    }

    /// Create metrics with custom registry
    pub fn with_registry(registry: &Registry) -> Result<Self, prometheus::Error> {
        let purge_requests_total = CounterVec::new(
            Opts::new("cdn_purge_requests_total", "Total number of purge operations"),
            &["operation"],
        )?;
        registry.register(Box::new(purge_requests_total.clone()))?;

        let purge_results_total = CounterVec::new(
            Opts::new(
                "cdn_purge_results_total",
                "Total number of purge outcomes by result",
            ),
            &["operation", "result"],
        )?;
        registry.register(Box::new(purge_results_total.clone()))?;

        let purge_urls_total = CounterVec::new(
            Opts::new(
                "cdn_purge_urls_total",
                "Total number of URLs submitted for purging",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(purge_urls_total.clone()))?;

        let provider_calls_total = CounterVec::new(
            Opts::new(
                "cdn_purge_provider_calls_total",
                "Total number of purge calls made to the CDN provider",
            ),
            &["operation", "result"],
        )?;
        registry.register(Box::new(provider_calls_total.clone()))?;

        let purge_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "cdn_purge_duration_seconds",
                "Duration of purge operations in seconds",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["operation"],
        )?;
        registry.register(Box::new(purge_duration_seconds.clone()))?;

        Ok(Self {
            purge_requests_total: Arc::new(purge_requests_total),
            purge_results_total: Arc::new(purge_results_total),
            purge_urls_total: Arc::new(purge_urls_total),
            provider_calls_total: Arc::new(provider_calls_total),
            purge_duration_seconds: Arc::new(purge_duration_seconds),
        })
    }

    /// Record a purge operation
    pub fn record_request(&self, operation: &str) {
        self.purge_requests_total
            .with_label_values(&[operation])
            .inc();
    }

    /// Record one outcome
    pub fn record_result(&self, operation: &str, success: bool) {
        let result = if success { "success" } else { "failure" };
        self.purge_results_total
            .with_label_values(&[operation, result])
            .inc();
    }

    /// Record submitted URL count
    pub fn record_urls(&self, operation: &str, count: usize) {
        self.purge_urls_total
            .with_label_values(&[operation])
            .inc_by(count as f64);
    }

    /// Record a provider purge call
    pub fn record_provider_call(&self, operation: &str, success: bool) {
        let result = if success { "success" } else { "failure" };
        self.provider_calls_total
            .with_label_values(&[operation, result])
            .inc();
    }

    /// Record purge duration
    pub fn record_duration(&self, operation: &str, duration_secs: f64) {
        self.purge_duration_seconds
            .with_label_values(&[operation])
            .observe(duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_with_registry() {
        let registry = Registry::new();
        let metrics = PurgeMetrics::with_registry(&registry).unwrap();

        metrics.record_request("pages");
        metrics.record_urls("pages", 3);
        metrics.record_result("pages", true);
        metrics.record_result("pages", false);
        metrics.record_provider_call("pages", true);
        metrics.record_duration("pages", 0.2);

        assert_eq!(
            metrics
                .purge_requests_total
                .with_label_values(&["pages"])
                .get(),
            1.0
        );
        assert_eq!(
            metrics.purge_urls_total.with_label_values(&["pages"]).get(),
            3.0
        );
        assert_eq!(
            metrics
                .purge_results_total
                .with_label_values(&["pages", "failure"])
                .get(),
            1.0
        );
        assert!(!registry.gather().is_empty());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = Registry::new();
        assert!(PurgeMetrics::with_registry(&registry).is_ok());
        assert!(PurgeMetrics::with_registry(&registry).is_err());
    }
}
