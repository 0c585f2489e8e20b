//! Shared application state

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use sunsights_classifiers::build_adapter;
use sunsights_policy::SentimentAnalyzer;
use sunsights_telemetry::AnalyticsStore;
use tracing::info;

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Feedback analyzer with its classifiers loaded
    pub analyzer: Arc<SentimentAnalyzer>,

    /// Dashboard counters and activity feed
    pub analytics: Arc<AnalyticsStore>,

    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Load classifiers and analytics from configuration
    pub async fn new(config: ServerConfig, metrics_handle: Option<PrometheusHandle>) -> Result<Self> {
        info!("Initializing application state");

        let adapter = build_adapter(&config.classifiers).await?;
        let analyzer = SentimentAnalyzer::new(adapter)?;

        let analytics = AnalyticsStore::open(&config.analytics_path);
        info!(path = %config.analytics_path.display(), "Analytics store ready");

        Ok(Self::from_parts(analyzer, analytics, config, metrics_handle))
    }

    pub fn from_parts(
        analyzer: SentimentAnalyzer,
        analytics: AnalyticsStore,
        config: ServerConfig,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            analytics: Arc::new(analytics),
            config: Arc::new(config),
            metrics_handle,
        }
    }
}
