//! Core traits for cache operations

mod metrics;
mod serializer;
mod store;

#[cfg(feature = "tracing")]
mod tracing;

pub use metrics::{CacheMetrics, CacheOperation, NoopMetrics};
pub use serializer::Serializer;
pub use store::CacheStore;

#[cfg(feature = "json")]
pub use serializer::JsonSerializer;

#[cfg(feature = "metrics")]
pub use metrics::MetricsCrateAdapter;

#[cfg(feature = "tracing")]
pub use self::tracing::TracingMetrics;
