//! HTTP boundary for herd-cache
//!
//! Serves a [`ReadThrough`](herd_cache::ReadThrough) key over axum: every
//! `GET /` becomes one coalesced cache call, answered as `{"data": ...}`.

pub mod rejection;
pub mod routes;

pub use rejection::CacheRejection;
pub use routes::{DataEnvelope, router};
