use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// OpenTelemetry export settings
///
/// Logging to stdout works without this section; it only adds OTLP export.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    pub service_name: String,
    /// Extra resource attributes attached to every span and metric
    pub resource_attributes: BTreeMap<String, String>,
    pub exporter: Option<ExporterConfig>,
    pub tracing: TracingConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tollgate".to_owned(),
            resource_attributes: BTreeMap::new(),
            exporter: None,
            tracing: TracingConfig::default(),
        }
    }
}

/// Collector shared by traces and metrics
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub endpoint: Url,
    #[serde(default)]
    pub protocol: ExportProtocol,
    /// Metric push period, e.g. `"30s"`
    #[serde(default = "default_metrics_interval")]
    pub metrics_interval: String,
}

impl ExporterConfig {
    /// Parsed metric push period
    ///
    /// # Errors
    ///
    /// Returns an error if `metrics_interval` is not a valid duration
    pub fn metrics_interval(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.metrics_interval)
            .map_err(|e| anyhow::anyhow!("invalid metrics interval '{}': {e}", self.metrics_interval))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    #[default]
    Grpc,
    HttpProto,
}

/// Trace sampling
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TracingConfig {
    /// Fraction of root traces kept, between 0 and 1
    pub sampling_rate: f64,
    /// Follow the caller's sampling decision when a parent span exists
    pub parent_based: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 1.0,
            parent_based: true,
        }
    }
}

fn default_metrics_interval() -> String {
    "30s".to_owned()
}
