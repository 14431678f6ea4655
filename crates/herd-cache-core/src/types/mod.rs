//! Core types for cache operations

mod ack;
mod options;
mod stats;

pub use ack::WriteAck;
pub use options::{CacheOptions, CacheOpts, DEFAULT_TTL};
pub use stats::CacheStats;
