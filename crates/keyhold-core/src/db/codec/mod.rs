//! Module: db::codec
//! Responsibility: value <-> byte encodings used as bucket keys.
//! Does not own: record payload serialization or index entry framing.
//! Boundary: condition builders and index maintenance encode through here.
//!
//! Scalars encode so that byte order matches value order within one kind.
//! Everything else goes through [`Opaque`], which round-trips but carries no
//! ordering guarantee.

mod kind;
mod opaque;
mod ordered;


pub use kind::ValueKind;
pub use opaque::Opaque;

use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    serialize::SerializeError,
};
use thiserror::Error as ThisError;

///
/// EncodeValue
///
/// A value with a stable byte encoding and a declared kind.
///

pub trait EncodeValue {
    const KIND: ValueKind;

    fn encode_value(&self) -> Result<Vec<u8>, CodecError>;
}

impl<T: EncodeValue + ?Sized> EncodeValue for &T {
    const KIND: ValueKind = T::KIND;

    fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
        (**self).encode_value()
    }
}

///
/// DecodeValue
///
/// Exact inverse of [`EncodeValue`] for owned types.
///

pub trait DecodeValue: Sized {
    fn decode_value(bytes: &[u8]) -> Result<Self, CodecError>;
}

/// Encode a value with its kind's codec.
pub fn encode<V>(value: &V) -> Result<Vec<u8>, CodecError>
where
    V: EncodeValue + ?Sized,
{
    value.encode_value()
}

/// Decode bytes produced by [`encode`].
pub fn decode<T: DecodeValue>(bytes: &[u8]) -> Result<T, CodecError> {
    T::decode_value(bytes)
}

///
/// CodecError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CodecError {
    #[error("NaN has no ordered encoding")]
    NotANumber,

    #[error("invalid {kind} encoding length: expected {expected}, found {found}")]
    InvalidLength {
        kind: ValueKind,
        expected: usize,
        found: usize,
    },

    #[error("invalid {kind} sign marker 0x{marker:02x}")]
    InvalidMarker { kind: ValueKind, marker: u8 },

    #[error("decoded value out of range for {kind}")]
    OutOfRange { kind: ValueKind },

    #[error("{kind} integer prefix does not match trailing bits")]
    ProxyMismatch { kind: ValueKind },

    #[error("text encoding is not valid utf-8")]
    InvalidUtf8,

    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),

    #[error("value kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("opaque value: {0}")]
    Opaque(SerializeError),
}

impl CodecError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotANumber => ErrorClass::Unsupported,
            Self::KindMismatch { .. } => ErrorClass::TypeMismatch,
            Self::Opaque(err) => err.class(),
            Self::InvalidLength { .. }
            | Self::InvalidMarker { .. }
            | Self::OutOfRange { .. }
            | Self::ProxyMismatch { .. }
            | Self::InvalidUtf8
            | Self::InvalidBool(_) => ErrorClass::Corruption,
        }
    }
}

impl From<CodecError> for InternalError {
    fn from(err: CodecError) -> Self {
        Self::new(err.class(), ErrorOrigin::Codec, err.to_string())
    }
}
