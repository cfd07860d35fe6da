use super::{CodecError, DecodeValue, EncodeValue, ValueKind};
use crate::serialize::{deserialize, serialize};
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

///
/// Opaque
///
/// Wraps a non-scalar value so it can be stored under the codec contract.
/// The CBOR bytes round-trip exactly but do not sort like the value, so an
/// opaque value can be matched by equality and never by range.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Opaque<T>(pub T);

impl<T> Opaque<T> {
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize> EncodeValue for Opaque<T> {
    const KIND: ValueKind = ValueKind::Opaque;

    fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
        serialize(&self.0).map_err(CodecError::Opaque)
    }
}

impl<T: DeserializeOwned> DecodeValue for Opaque<T> {
    fn decode_value(bytes: &[u8]) -> Result<Self, CodecError> {
        deserialize(bytes).map(Self).map_err(CodecError::Opaque)
    }
}
