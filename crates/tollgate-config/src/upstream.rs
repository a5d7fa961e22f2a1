use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Upstream completion API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Full URL requests are POSTed to
    pub url: Url,
    /// Bearer token sent as `Authorization` upstream
    pub api_key: SecretString,
    /// Request timeout (e.g. "10s", "500ms")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Model name placed in every upstream payload
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature placed in every upstream payload
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Completion length cap placed in every upstream payload
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl UpstreamConfig {
    /// Parse the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is malformed
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout)
            .map_err(|e| anyhow::anyhow!("invalid upstream timeout '{}': {e}", self.timeout))
    }
}

fn default_timeout() -> String {
    "10s".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature() -> f64 {
    1.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_tokens() -> u32 {
    100
}
