//! Metrics trait for cache observability

use std::time::Duration;

/// Cache operation for latency tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    /// Store read
    Get,
    /// Store write
    Set,
    /// Leader running the producer
    Populate,
    /// Follower waiting on an in-flight population
    Wait,
}

impl CacheOperation {
    /// Get operation as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOperation::Get => "get",
            CacheOperation::Set => "set",
            CacheOperation::Populate => "populate",
            CacheOperation::Wait => "wait",
        }
    }
}

/// Trait for cache metrics/observability
///
/// Implement this to integrate with your metrics system (Prometheus, StatsD, etc.)
pub trait CacheMetrics: Send + Sync + 'static {
    /// Record a cache hit
    fn record_hit(&self, key: &str);

    /// Record a cache miss
    fn record_miss(&self, key: &str);

    /// Record a caller attaching to an in-flight population as a follower
    fn record_coalesced(&self, key: &str);

    /// Record a population that ended without a value in the store
    fn record_population_failure(&self, key: &str, kind: &'static str);

    /// Record operation latency
    fn record_latency(&self, operation: CacheOperation, duration: Duration);
}

/// No-op metrics implementation (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl CacheMetrics for NoopMetrics {
    #[inline]
    fn record_hit(&self, _key: &str) {}

    #[inline]
    fn record_miss(&self, _key: &str) {}

    #[inline]
    fn record_coalesced(&self, _key: &str) {}

    #[inline]
    fn record_population_failure(&self, _key: &str, _kind: &'static str) {}

    #[inline]
    fn record_latency(&self, _operation: CacheOperation, _duration: Duration) {}
}

/// Metrics adapter using the `metrics` crate
///
/// # Example
/// ```ignore
/// use herd_cache_core::MetricsCrateAdapter;
///
/// // Set up a metrics recorder (e.g., prometheus_exporter)
/// // metrics::set_global_recorder(recorder);
///
/// let metrics = MetricsCrateAdapter::new("herd_cache");
/// // Emits: herd_cache_hits_total, herd_cache_coalesced_total, etc.
/// ```
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsCrateAdapter {
    prefix: String,
}

#[cfg(feature = "metrics")]
impl MetricsCrateAdapter {
    /// Create a new adapter with the given metric name prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn metric_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }
}

#[cfg(feature = "metrics")]
impl CacheMetrics for MetricsCrateAdapter {
    fn record_hit(&self, _key: &str) {
        metrics::counter!(self.metric_name("hits_total")).increment(1);
    }

    fn record_miss(&self, _key: &str) {
        metrics::counter!(self.metric_name("misses_total")).increment(1);
    }

    fn record_coalesced(&self, _key: &str) {
        metrics::counter!(self.metric_name("coalesced_total")).increment(1);
    }

    fn record_population_failure(&self, _key: &str, kind: &'static str) {
        metrics::counter!(
            self.metric_name("population_failures_total"),
            "kind" => kind
        )
        .increment(1);
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        metrics::histogram!(
            self.metric_name("operation_duration_seconds"),
            "operation" => operation.as_str()
        )
        .record(duration.as_secs_f64());
    }
}
