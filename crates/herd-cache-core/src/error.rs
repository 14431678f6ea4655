//! Error types for cache operations

use thiserror::Error;

/// Boxed error returned by loaders and other caller-supplied producers
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all cache operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The backing store could not be reached or the round trip failed
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store answered a write with something other than the success token
    #[error("store rejected write for key {key}: {status}")]
    StoreWriteRejected { key: String, status: String },

    /// Encoding a produced value failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Stored bytes do not decode to the expected document shape
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The producer failed, or the in-flight population left nothing behind
    #[error("population failed: {0}")]
    PopulationFailed(String),
}

impl CacheError {
    /// Stable label for logs, metrics and error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::StoreUnavailable(_) => "store_unavailable",
            CacheError::StoreWriteRejected { .. } => "store_write_rejected",
            CacheError::Serialization(_) => "serialization",
            CacheError::Deserialization(_) => "deserialization",
            CacheError::PopulationFailed(_) => "population_failed",
        }
    }

    /// Whether retrying the same call later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, CacheError::StoreUnavailable(_))
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::StoreUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "store unavailable: connection refused");

        let err = CacheError::StoreWriteRejected {
            key: "user-key".to_string(),
            status: "ERR readonly".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "store rejected write for key user-key: ERR readonly"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            CacheError::PopulationFailed("boom".into()).kind(),
            "population_failed"
        );
        assert_eq!(
            CacheError::Deserialization("eof".into()).kind(),
            "deserialization"
        );
    }

    #[test]
    fn test_only_store_unavailable_is_transient() {
        assert!(CacheError::StoreUnavailable("timeout".into()).is_transient());
        assert!(
            !CacheError::StoreWriteRejected {
                key: "k".into(),
                status: "nil".into()
            }
            .is_transient()
        );
        assert!(!CacheError::PopulationFailed("boom".into()).is_transient());
    }

    #[test]
    fn test_error_clone() {
        let err = CacheError::Serialization("bad float".into());
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
