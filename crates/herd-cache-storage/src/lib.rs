//! herd-cache-storage: Storage backends for herd-cache

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "memory")]
pub use memory::{MemoryConfig, MemoryStore};

#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisStore};
