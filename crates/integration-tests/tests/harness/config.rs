//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use tollgate_config::{Config, LedgerConfig, ServerConfig, StoreConfig, UpstreamConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal configuration relaying to `upstream_url`
    pub fn new(upstream_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                store: StoreConfig::Memory,
                upstream: UpstreamConfig {
                    url: upstream_url.parse().expect("valid URL"),
                    api_key: SecretString::from("upstream-secret"),
                    timeout: "5s".to_owned(),
                    model: "gpt-3.5-turbo".to_owned(),
                    temperature: 1.0,
                    max_tokens: 100,
                },
                ledger: LedgerConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Refuse deductions that would leave less than `minimum`
    pub fn with_minimum_balance(mut self, minimum: f64) -> Self {
        self.config.ledger.minimum_balance = Some(minimum);
        self
    }

    /// Report every error envelope with status 200
    pub fn with_uniform_error_status(mut self) -> Self {
        self.config.server.uniform_error_status = true;
        self
    }

    /// Cap the proxied request body
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.config.server.max_body_bytes = limit;
        self
    }

    /// Override the upstream timeout
    pub fn with_upstream_timeout(mut self, timeout: &str) -> Self {
        self.config.upstream.timeout = timeout.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
