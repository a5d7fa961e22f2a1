use serde::Deserialize;
use url::Url;

/// Key-value store backend for balances and service keys
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-process storage, lost on restart (development and tests)
    Memory,
    /// Redis-backed storage (durable, shared between instances)
    Redis(RedisConfig),
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Redis(RedisConfig::default())
    }
}

impl StoreConfig {
    /// Backend name as written in configuration
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis(_) => "redis",
        }
    }
}

/// Redis connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub url: Url,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

fn default_redis_url() -> Url {
    Url::parse("redis://127.0.0.1:6379").expect("must be a valid URL")
}

#[allow(clippy::missing_const_for_fn)]
fn default_connect_timeout() -> u64 {
    5
}
