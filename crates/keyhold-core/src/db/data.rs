//! Record payloads stored in the primary bucket.

use crate::{
    config::DbConfig,
    error::{ErrorClass, ErrorOrigin, InternalError},
    serialize,
    traits::EntityKind,
};

/// Serialize a record, enforcing the configured payload limit.
pub(crate) fn encode_row<E: EntityKind>(entity: &E, config: &DbConfig) -> Result<Vec<u8>, InternalError> {
    let bytes = serialize::serialize(entity)?;
    if bytes.len() > config.max_value_bytes {
        return Err(InternalError::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Serialize,
            format!(
                "record exceeds max size: {} ({} bytes, limit {})",
                E::MODEL.name,
                bytes.len(),
                config.max_value_bytes
            ),
        ));
    }

    Ok(bytes)
}

/// Decode a stored record and check it really lives under `key`.
pub(crate) fn decode_row<E: EntityKind>(
    key: &[u8],
    bytes: &[u8],
    config: &DbConfig,
) -> Result<E, InternalError> {
    let entity: E = serialize::deserialize_bounded(bytes, config.max_value_bytes)?;

    let row_key = entity.encoded_key()?;
    if row_key != key {
        return Err(InternalError::store_corruption(format!(
            "row stored under key {key:02x?} decodes with key {row_key:02x?} ({})",
            E::MODEL.name
        )));
    }

    Ok(entity)
}
