//! In-memory store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use herd_cache_core::{CacheStats, CacheStore, Result, WriteAck};

/// Configuration for the memory store
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Number of entries to preallocate room for
    pub initial_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1_024,
        }
    }
}

impl MemoryConfig {
    /// Create config with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
        }
    }
}

/// Internal statistics tracking
#[derive(Debug, Default)]
struct MemoryStats {
    hits: u64,
    misses: u64,
    writes: u64,
    expirations: u64,
}

#[derive(Debug, Clone)]
struct StoredValue {
    bytes: Vec<u8>,
    expires_at: Instant,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory store
///
/// Deadlines are taken from the tokio clock, so a paused runtime controls
/// expiry. Expired entries read as misses and are dropped on access.
/// Cloning creates a new handle to the SAME underlying map.
#[derive(Clone)]
pub struct MemoryStore {
    data: Arc<DashMap<String, StoredValue>>,
    stats: Arc<RwLock<MemoryStats>>,
}

impl MemoryStore {
    /// Create a new memory store
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            data: Arc::new(DashMap::with_capacity(config.initial_capacity)),
            stats: Arc::new(RwLock::new(MemoryStats::default())),
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(MemoryConfig::default())
    }

    /// Drop every expired entry and return how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.data.len();
        self.data.retain(|_, value| !value.is_expired(now));
        let removed = before.saturating_sub(self.data.len());
        self.stats.write().expirations += removed as u64;
        removed
    }

    /// Number of stored entries, expired ones included until purged
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        let found = self
            .data
            .get(key)
            .map(|value| (!value.is_expired(now)).then(|| value.bytes.clone()));

        match found {
            Some(Some(bytes)) => {
                self.stats.write().hits += 1;
                Ok(Some(bytes))
            }
            Some(None) => {
                // A concurrent write may have replaced the entry since the read.
                if self
                    .data
                    .remove_if(key, |_, value| value.is_expired(now))
                    .is_some()
                {
                    self.stats.write().expirations += 1;
                }
                self.stats.write().misses += 1;
                Ok(None)
            }
            None => {
                self.stats.write().misses += 1;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<WriteAck> {
        let stored = StoredValue {
            bytes: value,
            expires_at: Instant::now() + ttl,
        };
        self.data.insert(key.to_string(), stored);
        self.stats.write().writes += 1;
        Ok(WriteAck::ok())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let stats = self.stats.read();
        Ok(CacheStats {
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            rejected_writes: 0,
            expirations: stats.expirations,
            size: self.data.len(),
        })
    }
}
