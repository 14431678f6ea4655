use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use bb8_redis::RedisConnectionManager;
use parking_lot::RwLock;
use redis::{AsyncCommands, RedisError, Value};
use std::sync::Arc;
use std::time::Duration;

use herd_cache_core::{CacheError, CacheStats, CacheStore, Result, WriteAck};

use super::config::RedisConfig;

/// Redis store implementation
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool<RedisConnectionManager>,
    config: RedisConfig,
    stats: Arc<RwLock<CacheStats>>,
}

impl RedisStore {
    /// Create a new Redis store
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        Ok(Self {
            pool,
            config,
            stats: Arc::new(RwLock::new(CacheStats::default())),
        })
    }

    /// Get prefix for a key
    fn prefixed_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Get connection from pool
    async fn get_connection(&self) -> Result<PooledConnection<'_, RedisConnectionManager>> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))
    }
}

/// Expiry argument pair for `SET`
///
/// Whole seconds go out as `EX`; anything finer, including a zero TTL that
/// Redis would refuse, is sent as `PX` with at least one millisecond.
fn expiry_args(ttl: Duration) -> (&'static str, u64) {
    if ttl.subsec_nanos() == 0 && ttl.as_secs() > 0 {
        ("EX", ttl.as_secs())
    } else {
        ("PX", (ttl.as_millis() as u64).max(1))
    }
}

/// Status text of a `SET` reply
fn reply_status(reply: &Value) -> String {
    match reply {
        Value::Okay => WriteAck::SUCCESS.to_string(),
        Value::SimpleString(status) => status.clone(),
        Value::Nil => "nil".to_string(),
        other => format!("{:?}", other),
    }
}

/// Transport failures are unavailability; anything the server said is a rejection.
fn write_error(key: &str, err: RedisError) -> CacheError {
    if err.is_io_error() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::StoreUnavailable(err.to_string())
    } else {
        CacheError::StoreWriteRejected {
            key: key.to_string(),
            status: err.to_string(),
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.get_connection().await?;
        let prefixed = self.prefixed_key(key);

        let bytes: Option<Vec<u8>> = conn
            .get(&prefixed)
            .await
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        let mut stats = self.stats.write();
        if bytes.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        Ok(bytes)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<WriteAck> {
        let mut conn = self.get_connection().await?;
        let prefixed = self.prefixed_key(key);
        let (unit, amount) = expiry_args(ttl);

        let reply: Value = redis::cmd("SET")
            .arg(&prefixed)
            .arg(value)
            .arg(unit)
            .arg(amount)
            .query_async(&mut *conn)
            .await
            .map_err(|e| write_error(key, e))?;

        let ack = WriteAck::new(reply_status(&reply));
        let mut stats = self.stats.write();
        if ack.is_success() {
            stats.writes += 1;
        } else {
            stats.rejected_writes += 1;
        }
        Ok(ack)
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(self.stats.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_seconds_use_ex() {
        assert_eq!(expiry_args(Duration::from_secs(10)), ("EX", 10));
    }

    #[test]
    fn test_fractional_ttl_uses_px() {
        assert_eq!(expiry_args(Duration::from_millis(1500)), ("PX", 1500));
        assert_eq!(expiry_args(Duration::from_millis(250)), ("PX", 250));
    }

    #[test]
    fn test_zero_ttl_is_clamped() {
        assert_eq!(expiry_args(Duration::ZERO), ("PX", 1));
    }

    #[test]
    fn test_reply_status() {
        assert_eq!(reply_status(&Value::Okay), "OK");
        assert_eq!(
            reply_status(&Value::SimpleString("QUEUED".to_string())),
            "QUEUED"
        );
        assert_eq!(reply_status(&Value::Nil), "nil");
        assert!(!WriteAck::new(reply_status(&Value::Nil)).is_success());
    }
}
