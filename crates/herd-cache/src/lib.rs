//! herd-cache: read-through caching with per-key request coalescing
//!
//! When many tasks miss the same key at once, exactly one of them (the
//! leader) runs the expensive producer and writes the result to the store.
//! The rest (followers) wait for the leader to finish and read the value the
//! leader wrote. Different keys never wait on each other.
//!
//! The in-flight bookkeeping is local to one [`CoalescingCache`] and its
//! clones. Several processes sharing one Redis each coalesce on their own.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use herd_cache::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new(MemoryConfig::default());
//!     let cache = CoalescingCache::new(store);
//!
//!     let tracks: Vec<u32> = cache
//!         .get_or_populate("user-key", || async {
//!             Ok::<_, std::io::Error>(vec![23, 45, 77])
//!         })
//!         .await?;
//!
//!     println!("{:?}", tracks);
//!     Ok(())
//! }
//! ```

mod cache;

// Re-export core
pub use herd_cache_core::*;

// Re-export storage
#[cfg(feature = "memory")]
pub use herd_cache_storage::{MemoryConfig, MemoryStore};

#[cfg(feature = "redis")]
pub use herd_cache_storage::{RedisConfig, RedisStore};

pub use cache::{CacheConfig, CoalescingCache, Loader, ReadThrough};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BoxError, CacheConfig, CacheError, CacheOptions, CacheOpts, CacheStore, CoalescingCache,
        JsonSerializer, Loader, ReadThrough, Result, Serializer,
    };

    #[cfg(feature = "memory")]
    pub use crate::{MemoryConfig, MemoryStore};

    #[cfg(feature = "redis")]
    pub use crate::{RedisConfig, RedisStore};
}
