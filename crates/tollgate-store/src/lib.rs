//! Key-value storage for balances and service keys
//!
//! Values are plain strings. Balances are additionally mutated through
//! [`KeyValueStore::increment`], which every backend performs atomically
//! per key so concurrent adjustments never lose an update.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
pub mod keys;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tollgate_config::StoreConfig;

pub use error::StoreError;
pub use storage::memory::MemoryStore;
pub use storage::redis::RedisStore;

/// Store handle shared by every component
pub type SharedStore = Arc<dyn KeyValueStore>;

/// How an atomic increment treats the current value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncrementOptions {
    /// Treat an absent key as `0` instead of reporting [`Increment::Missing`]
    pub create_if_missing: bool,
    /// Refuse the change when the result would drop below this value
    pub floor: Option<f64>,
}

/// Outcome of an atomic increment
#[derive(Debug, Clone, PartialEq)]
pub enum Increment {
    /// The value was updated; carries the new value
    Applied(f64),
    /// The key does not exist and `create_if_missing` was not set
    Missing,
    /// The stored value is not a number; carries the raw value
    Unparseable(String),
    /// The result would fall below the floor; nothing was written
    BelowFloor {
        /// Value left untouched in the store
        current: f64,
    },
    /// The result would not be a finite number; nothing was written
    OutOfRange {
        /// Value left untouched in the store
        current: f64,
    },
}

/// Parse a stored numeric value
///
/// Accepts decimal and exponent notation only. `inf` and `NaN` count as
/// unparseable since they cannot round-trip through the JSON wire form.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// String-keyed storage shared across concurrent requests
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &'static str;

    /// Read a value
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Whether a key is present
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Add `delta` to the numeric value at `key` as a single atomic step
    async fn increment(&self, key: &str, delta: f64, options: IncrementOptions) -> Result<Increment, StoreError>;
}

/// Build the configured store backend
///
/// Redis connections are established eagerly so a bad URL or an unreachable
/// server fails at startup rather than on the first request.
pub async fn connect(config: &StoreConfig) -> Result<SharedStore, StoreError> {
    match config {
        StoreConfig::Memory => {
            tracing::warn!("using in-memory store, balances will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreConfig::Redis(redis_config) => {
            let store = RedisStore::connect(
                redis_config.url.as_str(),
                Duration::from_secs(redis_config.connect_timeout),
            )
            .await?;
            tracing::info!(host = redis_config.url.host_str().unwrap_or_default(), "connected to redis store");
            Ok(Arc::new(store))
        }
    }
}
