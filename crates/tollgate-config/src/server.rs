use std::net::SocketAddr;

use serde::Deserialize;

/// HTTP server configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind, `0.0.0.0:8000` when unset
    pub listen_address: Option<SocketAddr>,
    /// Return every error envelope with status 200 instead of a mapped status
    ///
    /// Only needed by clients that detect failures from the body alone.
    /// Covers every gateway error plus unknown routes and wrong methods.
    /// Relayed upstream responses keep their own status.
    #[serde(default)]
    pub uniform_error_status: bool,
    /// Maximum accepted request body size for the proxy route
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub health: HealthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            uniform_error_status: false,
            max_body_bytes: default_max_body_bytes(),
            health: HealthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Listen address with the default applied
    pub fn listen_address(&self) -> SocketAddr {
        self.listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8000)))
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

/// Liveness endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/health".to_owned(),
        }
    }
}
