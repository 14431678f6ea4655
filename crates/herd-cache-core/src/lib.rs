//! herd-cache-core: Core traits and types for the herd-cache library
//!
//! This crate holds the pieces shared by every layer of the workspace: the
//! error taxonomy, the store abstraction, serialization and metrics hooks.

mod error;
mod traits;
mod types;

pub use error::{BoxError, CacheError, Result};
pub use traits::*;
pub use types::*;
