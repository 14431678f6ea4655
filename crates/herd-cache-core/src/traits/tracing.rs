use crate::{CacheMetrics, CacheOperation};
use std::time::Duration;
use tracing::{debug, warn};

/// Metrics adapter that logs events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    /// Service name/prefix (optional)
    service_name: Option<String>,
}

impl TracingMetrics {
    /// Create new tracing metrics adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with service name prefix
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl CacheMetrics for TracingMetrics {
    fn record_hit(&self, key: &str) {
        debug!(
            target: "herd_cache",
            event = "hit",
            key = %key,
            service = ?self.service_name,
            "Cache Hit"
        );
    }

    fn record_miss(&self, key: &str) {
        debug!(
            target: "herd_cache",
            event = "miss",
            key = %key,
            service = ?self.service_name,
            "Cache Miss"
        );
    }

    fn record_coalesced(&self, key: &str) {
        debug!(
            target: "herd_cache",
            event = "coalesced",
            key = %key,
            service = ?self.service_name,
            "Joined In-Flight Population"
        );
    }

    fn record_population_failure(&self, key: &str, kind: &'static str) {
        warn!(
            target: "herd_cache",
            event = "population_failure",
            key = %key,
            kind = kind,
            service = ?self.service_name,
            "Cache Population Failed"
        );
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        tracing::trace!(
            target: "herd_cache",
            event = "latency",
            operation = operation.as_str(),
            duration_ms = duration.as_millis(),
            service = ?self.service_name,
            "Cache Operation Latency"
        );
    }
}
