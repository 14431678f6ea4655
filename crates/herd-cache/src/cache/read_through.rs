use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

use herd_cache_core::{BoxError, CacheMetrics, CacheOptions, CacheStore, Result, Serializer};

use super::CoalescingCache;

/// Source of truth consulted when the cached copy is missing
#[async_trait]
pub trait Loader<V>: Send + Sync + 'static {
    /// Produce a fresh value
    async fn load(&self) -> std::result::Result<V, BoxError>;
}

/// A cache key bound to the loader that fills it
///
/// This is the shape a request handler wants: one fixed key, one slow query,
/// and every concurrent request answered from a single execution.
pub struct ReadThrough<St, S, M, V, L>
where
    St: CacheStore,
    S: Serializer,
    M: CacheMetrics,
{
    cache: CoalescingCache<St, S, M>,
    key: String,
    loader: Arc<L>,
    options: CacheOptions,
    _value: PhantomData<fn() -> V>,
}

impl<St, S, M, V, L> ReadThrough<St, S, M, V, L>
where
    St: CacheStore,
    S: Serializer,
    M: CacheMetrics,
    V: Serialize + DeserializeOwned + Send + 'static,
    L: Loader<V>,
{
    /// Bind `loader` to `key` on `cache`
    pub fn new(cache: CoalescingCache<St, S, M>, key: impl Into<String>, loader: L) -> Self {
        Self {
            cache,
            key: key.into(),
            loader: Arc::new(loader),
            options: CacheOptions::default(),
            _value: PhantomData,
        }
    }

    /// Override the options used when the loader's value is written
    pub fn with_options(mut self, options: impl Into<CacheOptions>) -> Self {
        self.options = options.into();
        self
    }

    /// Cached value, loading it if missing (coalesced)
    pub async fn get(&self) -> Result<V> {
        self.cache
            .get_or_populate_with(&self.key, || self.loader.load(), self.options.clone())
            .await
    }

    /// The bound key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying cache
    pub fn cache(&self) -> &CoalescingCache<St, S, M> {
        &self.cache
    }
}

impl<St, S, M, V, L> Clone for ReadThrough<St, S, M, V, L>
where
    St: CacheStore,
    S: Serializer,
    M: CacheMetrics,
{
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            key: self.key.clone(),
            loader: self.loader.clone(),
            options: self.options.clone(),
            _value: PhantomData,
        }
    }
}
