mod cbor;

use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

/// Generic CBOR serialization infrastructure.
///
/// This module is format-level only:
/// - No storage-layer constants or policy limits are defined here.
/// - Callers that need bounded decode pass explicit limits.

///
/// SerializeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("deserialize size limit exceeded: {len} bytes (limit {max_bytes})")]
    DeserializeSizeLimitExceeded { len: usize, max_bytes: usize },
}

impl SerializeError {
    /// Encoding failures are unsupported values; decode failures are corrupt bytes.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Serialize(_) => ErrorClass::Unsupported,
            Self::Deserialize(_) | Self::DeserializeSizeLimitExceeded { .. } => {
                ErrorClass::Corruption
            }
        }
    }
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        Self::new(err.class(), ErrorOrigin::Serialize, err.to_string())
    }
}

/// Serialize a value into CBOR bytes.
pub fn serialize<T>(value: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    cbor::serialize(value)
}

/// Deserialize a value produced by [`serialize`].
pub fn deserialize<T>(bytes: &[u8]) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    cbor::deserialize(bytes)
}

/// Deserialize with an explicit upper bound on the input size.
pub fn deserialize_bounded<T>(bytes: &[u8], max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    if bytes.len() > max_bytes {
        return Err(SerializeError::DeserializeSizeLimitExceeded {
            len: bytes.len(),
            max_bytes,
        });
    }

    cbor::deserialize(bytes)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{SerializeError, deserialize, deserialize_bounded, serialize};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
    struct Sample {
        name: String,
        age: u32,
        tags: Vec<String>,
    }

    #[test]
    fn cbor_round_trip_preserves_struct() {
        let sample = Sample {
            name: "abc".to_string(),
            age: 10,
            tags: vec!["x".to_string()],
        };

        let bytes = serialize(&sample).expect("serialize");
        let decoded: Sample = deserialize(&bytes).expect("deserialize");

        assert_eq!(decoded, sample);
    }

    #[test]
    fn borrowed_field_encodes_like_owned_value() {
        let sample = Sample {
            name: "abc".to_string(),
            age: 10,
            tags: vec!["x".to_string(), "y".to_string()],
        };

        let borrowed = serialize(&sample.tags).expect("serialize borrowed");
        let owned = serialize(&sample.tags.clone()).expect("serialize owned");
        assert_eq!(borrowed, owned);

        let name = serialize(&sample.name.as_str()).expect("serialize str");
        assert_eq!(deserialize::<String>(&name).expect("deserialize"), "abc");
    }

    #[test]
    fn bounded_decode_rejects_oversized_input() {
        let bytes = serialize(&vec![0u8; 64]).expect("serialize");
        let err = deserialize_bounded::<Vec<u8>>(&bytes, 8).expect_err("size limit");

        assert!(matches!(
            err,
            SerializeError::DeserializeSizeLimitExceeded { max_bytes: 8, .. }
        ));
    }

    #[test]
    fn truncated_input_is_a_deserialize_error() {
        let mut bytes = serialize(&"hello world").expect("serialize");
        bytes.truncate(bytes.len() - 3);

        let err = deserialize::<String>(&bytes).expect_err("truncated");
        assert!(matches!(err, SerializeError::Deserialize(_)));
    }
}
