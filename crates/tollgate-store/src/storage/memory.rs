use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::{Increment, IncrementOptions, KeyValueStore, StoreError, parse_number};

/// In-process store backed by a sharded concurrent map
///
/// Increments run while holding the entry's shard lock, which makes them
/// atomic with respect to every other operation on the same key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Outcome of adding `delta` to `current` under `floor`
fn apply(current: f64, delta: f64, floor: Option<f64>) -> Result<f64, Increment> {
    let next = current + delta;
    if !next.is_finite() {
        return Err(Increment::OutOfRange { current });
    }
    match floor {
        Some(floor) if next < floor => Err(Increment::BelowFloor { current }),
        _ => Ok(next),
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.contains_key(key))
    }

    async fn increment(&self, key: &str, delta: f64, options: IncrementOptions) -> Result<Increment, StoreError> {
        let outcome = match self.entries.entry(key.to_owned()) {
            Entry::Vacant(vacant) => {
                if !options.create_if_missing {
                    return Ok(Increment::Missing);
                }
                match apply(0.0, delta, options.floor) {
                    Ok(next) => {
                        vacant.insert(next.to_string());
                        Increment::Applied(next)
                    }
                    Err(refused) => refused,
                }
            }
            Entry::Occupied(mut occupied) => {
                let Some(current) = parse_number(occupied.get()) else {
                    return Ok(Increment::Unparseable(occupied.get().clone()));
                };
                match apply(current, delta, options.floor) {
                    Ok(next) => {
                        occupied.insert(next.to_string());
                        Increment::Applied(next)
                    }
                    Err(refused) => refused,
                }
            }
        };

        Ok(outcome)
    }
}
