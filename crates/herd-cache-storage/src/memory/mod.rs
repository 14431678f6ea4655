//! In-memory store

mod store;

pub use store::{MemoryConfig, MemoryStore};
