use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::{Increment, IncrementOptions, KeyValueStore, StoreError};

/// Read, validate and update a numeric value in one server-side step
///
/// KEYS[1] value key, ARGV[1] delta, ARGV[2] "1" to create when missing,
/// ARGV[3] floor or "" for none. Replies with a status tag and a value.
/// Stored values must be plain decimal or exponent notation, the same
/// shapes `parse_number` accepts, so hex, padding and `inf` are refused.
static INCREMENT_SCRIPT: LazyLock<redis::Script> = LazyLock::new(|| {
    redis::Script::new(
        r"
local function finite(n)
  return n ~= nil and n == n and n ~= math.huge and n ~= -math.huge
end
local function numeric(s)
  local mantissa = string.match(s, '^[-+]?(%d*%.?%d*)$')
    or string.match(s, '^[-+]?(%d*%.?%d*)[eE][-+]?%d+$')
  if not mantissa or not string.find(mantissa, '%d') then
    return nil
  end
  local n = tonumber(s)
  if not finite(n) then
    return nil
  end
  return n
end
local raw = redis.call('GET', KEYS[1])
if not raw then
  if ARGV[2] ~= '1' then
    return {'missing', ''}
  end
  raw = '0'
end
local current = numeric(raw)
if not current then
  return {'unparseable', raw}
end
local updated = current + tonumber(ARGV[1])
if not finite(updated) then
  return {'out_of_range', raw}
end
if ARGV[3] ~= '' and updated < tonumber(ARGV[3]) then
  return {'below_floor', raw}
end
return {'applied', redis.call('INCRBYFLOAT', KEYS[1], ARGV[1])}
",
    )
});

/// Redis-backed store sharing one auto-reconnecting multiplexed connection
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis, failing if the server is not reachable in time
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Connect(format!("invalid redis URL: {e}")))?;

        let connection = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Connect(format!("timed out after {timeout:?}")))?
            .map_err(|e| StoreError::Connect(format!("failed to connect: {e}")))?;

        Ok(Self { connection })
    }
}

/// Translate the increment script reply into an [`Increment`]
fn parse_increment_reply(reply: &[String]) -> Result<Increment, StoreError> {
    let parse = |raw: &str| {
        raw.parse::<f64>()
            .map_err(|e| StoreError::Backend(format!("non-numeric increment reply '{raw}': {e}")))
    };

    match reply {
        [tag, _] if tag == "missing" => Ok(Increment::Missing),
        [tag, raw] if tag == "unparseable" => Ok(Increment::Unparseable(raw.clone())),
        [tag, raw] if tag == "below_floor" => Ok(Increment::BelowFloor { current: parse(raw)? }),
        [tag, raw] if tag == "out_of_range" => Ok(Increment::OutOfRange { current: parse(raw)? }),
        [tag, raw] if tag == "applied" => Ok(Increment::Applied(parse(raw)?)),
        other => Err(StoreError::Backend(format!("unexpected increment reply: {other:?}"))),
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection.clone();
        conn.get(key)
            .await
            .map_err(|e| StoreError::Backend(format!("GET failed: {e}")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        conn.set(key, value)
            .await
            .map_err(|e| StoreError::Backend(format!("SET failed: {e}")))
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection.clone();
        conn.exists(key)
            .await
            .map_err(|e| StoreError::Backend(format!("EXISTS failed: {e}")))
    }

    async fn increment(&self, key: &str, delta: f64, options: IncrementOptions) -> Result<Increment, StoreError> {
        let mut conn = self.connection.clone();

        let reply: Vec<String> = INCREMENT_SCRIPT
            .key(key)
            .arg(delta.to_string())
            .arg(if options.create_if_missing { "1" } else { "0" })
            .arg(options.floor.map(|floor| floor.to_string()).unwrap_or_default())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::Backend(format!("increment script failed: {e}")))?;

        parse_increment_reply(&reply)
    }
}
