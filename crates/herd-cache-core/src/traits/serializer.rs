//! Pluggable serialization trait

use crate::CacheError;
use serde::{Serialize, de::DeserializeOwned};

/// Encoding used for values on their way to and from the store
pub trait Serializer: Send + Sync + Clone + 'static {
    /// Name of the serializer (for debugging/metrics)
    fn name(&self) -> &str;

    /// Serialize a value to bytes
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CacheError>;

    /// Deserialize bytes to a value
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError>;
}

/// JSON serializer (default)
///
/// Values are stored as JSON text, readable with any store client.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

#[cfg(feature = "json")]
impl Serializer for JsonSerializer {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError> {
        serde_json::from_slice(bytes).map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Track {
        id: u32,
        name: String,
    }

    #[test]
    fn test_json_struct() {
        let serializer = JsonSerializer;
        let value = Track {
            id: 1,
            name: "A".to_string(),
        };

        let bytes = serializer.serialize(&value).unwrap();
        assert_eq!(bytes, br#"{"id":1,"name":"A"}"#);

        let decoded: Track = serializer.deserialize(&bytes).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn test_json_rejects_wrong_shape() {
        let err = JsonSerializer
            .deserialize::<Track>(br#"{"id":"one"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), "deserialization");

        let err = JsonSerializer.deserialize::<Track>(b"not json").unwrap_err();
        assert!(matches!(err, CacheError::Deserialization(_)));
    }

    #[test]
    fn test_json_serializer_name() {
        assert_eq!(JsonSerializer.name(), "json");
    }
}
