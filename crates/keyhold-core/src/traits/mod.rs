pub use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    db::codec::{CodecError, DecodeValue, EncodeValue},
    model::{entity::EntityModel, index::IndexModel},
};

///
/// EntityKind
///
/// A record type stored under one primary bucket with statically declared
/// secondary indexes. Records persist as CBOR; keys and indexed fields use
/// the ordered codec.
///

pub trait EntityKind: Serialize + DeserializeOwned {
    type Key: EncodeValue + DecodeValue;

    const MODEL: &'static EntityModel;

    fn key(&self) -> Self::Key;

    /// Encoded value of the field behind `index`, or `None` when this record
    /// is not indexed under it. Implementations usually delegate to
    /// [`index_field`].
    fn index_value(&self, index: &IndexModel) -> Result<Option<Vec<u8>>, CodecError>;

    /// Encoded primary key, checked against the declared key kind.
    fn encoded_key(&self) -> Result<Vec<u8>, CodecError> {
        if <Self::Key as EncodeValue>::KIND != Self::MODEL.key_kind {
            return Err(CodecError::KindMismatch {
                expected: Self::MODEL.key_kind,
                found: <Self::Key as EncodeValue>::KIND,
            });
        }

        self.key().encode_value()
    }
}

/// Encode a field value for `index`, rejecting a value of the wrong kind.
pub fn index_field<V>(index: &IndexModel, value: &V) -> Result<Option<Vec<u8>>, CodecError>
where
    V: EncodeValue + ?Sized,
{
    if V::KIND != index.kind {
        return Err(CodecError::KindMismatch {
            expected: index.kind,
            found: V::KIND,
        });
    }

    value.encode_value().map(Some)
}
