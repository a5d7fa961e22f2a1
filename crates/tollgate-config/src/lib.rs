#![allow(clippy::must_use_candidate)]

mod env;
pub mod ledger;
mod loader;
pub mod server;
pub mod store;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use ledger::*;
pub use server::*;
pub use store::*;
pub use telemetry::{ExportProtocol, ExporterConfig, TelemetryConfig, TracingConfig};
pub use upstream::*;

/// Top-level Tollgate configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Key-value store holding balances and service keys
    #[serde(default)]
    pub store: StoreConfig,
    /// Upstream completion API
    pub upstream: UpstreamConfig,
    /// Balance accounting rules
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
