//! Coalescing read-through cache

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use herd_cache_core::{
    CacheError, CacheMetrics, CacheOperation, CacheOptions, CacheStats, CacheStore, DEFAULT_TTL,
    JsonSerializer, NoopMetrics, Result, Serializer,
};

mod registry;
use registry::{Registry, Slot};

mod read_through;
pub use read_through::{Loader, ReadThrough};

/// Configuration for CoalescingCache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for entries written without an explicit override
    pub ttl: Duration,
    /// Namespace prefix for all keys
    pub namespace: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            namespace: None,
        }
    }
}

impl CacheConfig {
    /// Create config with specific TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Default::default()
        }
    }

    /// Create config with namespace
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }
}

/// Read-through cache that runs at most one producer per key at a time
///
/// Generic over:
/// - `St`: The backing store (Memory, Redis)
/// - `S`: The serializer
/// - `M`: The metrics collector
///
/// Cloning is cheap and every clone shares the store and the in-flight
/// registry, so coalescing spans all clones within this process.
pub struct CoalescingCache<St, S = JsonSerializer, M = NoopMetrics>
where
    St: CacheStore,
    S: Serializer,
    M: CacheMetrics,
{
    store: Arc<St>,
    serializer: Arc<S>,
    metrics: Arc<M>,
    config: CacheConfig,
    registry: Registry,
}

impl<St: CacheStore> CoalescingCache<St, JsonSerializer, NoopMetrics> {
    /// Create a new cache with default JSON serializer and no metrics
    pub fn new(store: St) -> Self {
        Self::with_config(store, CacheConfig::default())
    }

    /// Create with custom config
    pub fn with_config(store: St, config: CacheConfig) -> Self {
        Self::with_serializer_and_metrics(store, JsonSerializer, NoopMetrics, config)
    }
}

impl<St, S, M> CoalescingCache<St, S, M>
where
    St: CacheStore,
    S: Serializer,
    M: CacheMetrics,
{
    /// Create a cache with custom serializer and metrics
    pub fn with_serializer_and_metrics(
        store: St,
        serializer: S,
        metrics: M,
        config: CacheConfig,
    ) -> Self {
        Self {
            store: Arc::new(store),
            serializer: Arc::new(serializer),
            metrics: Arc::new(metrics),
            config,
            registry: Registry::new(),
        }
    }

    /// Get the full key with namespace prefix
    fn full_key(&self, key: &str) -> String {
        match &self.config.namespace {
            Some(ns) => format!("{}:{}", ns, key),
            None => key.to_string(),
        }
    }

    /// Get a value from the store
    ///
    /// Returns `Ok(None)` when the key is absent or expired.
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.lookup(&self.full_key(key)).await
    }

    /// Write a value with the configured TTL and hand it back
    pub async fn set<T>(&self, key: &str, value: T) -> Result<T>
    where
        T: Serialize,
    {
        self.set_with(key, value, CacheOptions::default()).await
    }

    /// Write a value with per-call options and hand it back
    pub async fn set_with<T>(
        &self,
        key: &str,
        value: T,
        options: impl Into<CacheOptions>,
    ) -> Result<T>
    where
        T: Serialize,
    {
        let ttl = self.effective_ttl(&options.into());
        self.write(&self.full_key(key), &value, ttl).await?;
        Ok(value)
    }

    /// Return the cached value for `key`, or populate it with `producer`.
    ///
    /// Concurrent misses on one key run `producer` once. The caller that runs
    /// it (the leader) gets its own result or error back; everyone else waits
    /// for the leader to finish and then re-reads the store. A follower that
    /// still finds nothing gets [`CacheError::PopulationFailed`].
    pub async fn get_or_populate<T, F, Fut, E>(&self, key: &str, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        self.get_or_populate_with(key, producer, CacheOptions::default())
            .await
    }

    /// [`get_or_populate`](Self::get_or_populate) with per-call options
    pub async fn get_or_populate_with<T, F, Fut, E>(
        &self,
        key: &str,
        producer: F,
        options: impl Into<CacheOptions>,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        let full_key = self.full_key(key);
        let ttl = self.effective_ttl(&options.into());

        if let Some(value) = self.lookup(&full_key).await? {
            return Ok(value);
        }

        match self.registry.join(&full_key) {
            Slot::Follower(waiter) => {
                self.metrics.record_coalesced(&full_key);
                debug!(target: "herd_cache", key = %full_key, "waiting on in-flight population");

                let start = Instant::now();
                waiter.wait().await;
                self.metrics
                    .record_latency(CacheOperation::Wait, start.elapsed());

                match self.lookup(&full_key).await? {
                    Some(value) => Ok(value),
                    None => {
                        let err = CacheError::PopulationFailed(format!(
                            "in-flight population for {} left no value",
                            full_key
                        ));
                        self.metrics
                            .record_population_failure(&full_key, err.kind());
                        Err(err)
                    }
                }
            }
            Slot::Leader(guard) => {
                debug!(target: "herd_cache", key = %full_key, "leading population");
                let result = self.populate(&full_key, producer, ttl).await;

                if let Err(err) = &result {
                    self.metrics.record_population_failure(&full_key, err.kind());
                    warn!(
                        target: "herd_cache",
                        key = %full_key,
                        kind = err.kind(),
                        followers = guard.followers(),
                        error = %err,
                        "population failed"
                    );
                }

                // Unregister, then wake followers.
                drop(guard);
                result
            }
        }
    }

    /// Leader body: double-check the store, produce, write.
    async fn populate<T, F, Fut, E>(&self, full_key: &str, producer: F, ttl: Duration) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        // A previous leader may have finished between our miss and our registration.
        if let Some(value) = self.lookup(full_key).await? {
            return Ok(value);
        }

        let start = Instant::now();
        let value = producer()
            .await
            .map_err(|e| CacheError::PopulationFailed(e.to_string()))?;
        self.metrics
            .record_latency(CacheOperation::Populate, start.elapsed());

        self.write(full_key, &value, ttl).await?;
        Ok(value)
    }

    async fn lookup<T>(&self, full_key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let bytes = self.store.get(full_key).await?;
        self.metrics
            .record_latency(CacheOperation::Get, start.elapsed());

        match bytes {
            Some(bytes) => {
                self.metrics.record_hit(full_key);
                self.serializer.deserialize(&bytes).map(Some)
            }
            None => {
                self.metrics.record_miss(full_key);
                Ok(None)
            }
        }
    }

    async fn write<T>(&self, full_key: &str, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize,
    {
        let bytes = self.serializer.serialize(value)?;

        let start = Instant::now();
        let ack = self.store.set(full_key, bytes, ttl).await?;
        self.metrics
            .record_latency(CacheOperation::Set, start.elapsed());

        if !ack.is_success() {
            warn!(target: "herd_cache", key = %full_key, status = %ack, "store rejected write");
            return Err(CacheError::StoreWriteRejected {
                key: full_key.to_string(),
                status: ack.status().to_string(),
            });
        }
        Ok(())
    }

    fn effective_ttl(&self, options: &CacheOptions) -> Duration {
        options.ttl.unwrap_or(self.config.ttl)
    }

    /// Whether a population for `key` is running right now
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.registry.contains(&self.full_key(key))
    }

    /// Number of populations running right now
    pub fn in_flight_count(&self) -> usize {
        self.registry.len()
    }

    /// Get store statistics
    pub async fn stats(&self) -> Result<CacheStats> {
        self.store.stats().await
    }

    /// The configuration this cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl<St, S, M> Clone for CoalescingCache<St, S, M>
where
    St: CacheStore,
    S: Serializer,
    M: CacheMetrics,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            serializer: self.serializer.clone(),
            metrics: self.metrics.clone(),
            config: self.config.clone(),
            registry: self.registry.clone(),
        }
    }
}
