//! Backing store trait

use async_trait::async_trait;
use std::time::Duration;

use crate::{CacheError, CacheStats, WriteAck};

/// Key-value store with store-managed expiration
///
/// This is the only surface the coalescing layer needs from a store: a single
/// key read and a single key write with a TTL. Implementations include an
/// in-memory map and Redis.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Read the raw bytes stored under `key`
    ///
    /// Returns `None` if the key doesn't exist or has expired. Transport
    /// failures are reported as [`CacheError::StoreUnavailable`].
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Write `value` under `key`, expiring after `ttl`
    ///
    /// The store's acknowledgement is returned untouched; deciding whether it
    /// signals success is the caller's job.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration)
        -> Result<WriteAck, CacheError>;

    /// Get store statistics
    async fn stats(&self) -> Result<CacheStats, CacheError> {
        Ok(CacheStats::default())
    }
}
