//! Module: db::condition
//! Responsibility: predicate values as canonical interval sets over encoded keys.
//! Does not own: cursor traversal or target/kind validation against a model.
//! Boundary: pure value algebra; no store access.

mod equal;
mod pair;
mod range;

#[cfg(test)]
mod tests;

pub use equal::EqualCondition;
pub use pair::{Union, ValuePair};
pub use range::RangeCondition;

use crate::{
    db::codec::{CodecError, EncodeValue, ValueKind},
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use std::ops::Bound;
use thiserror::Error as ThisError;

///
/// ConditionError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConditionError {
    #[error("condition value failed to encode: {0}")]
    Encode(CodecError),

    #[error("condition kinds differ: {left} vs {right}")]
    KindMismatch { left: ValueKind, right: ValueKind },

    #[error("{kind} values have no ordered encoding and cannot bound a range")]
    NotOrderable { kind: ValueKind },
}

impl ConditionError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Encode(err) => err.class(),
            Self::KindMismatch { .. } => ErrorClass::TypeMismatch,
            Self::NotOrderable { .. } => ErrorClass::Unsupported,
        }
    }
}

impl From<ConditionError> for InternalError {
    fn from(err: ConditionError) -> Self {
        Self::new(err.class(), ErrorOrigin::Query, err.to_string())
    }
}

fn encode_orderable<V: EncodeValue>(value: &V) -> Result<Vec<u8>, ConditionError> {
    if !V::KIND.is_orderable() {
        return Err(ConditionError::NotOrderable { kind: V::KIND });
    }

    value.encode_value().map_err(ConditionError::Encode)
}

fn anchored<V, F>(value: &V, bounds: F) -> RangeCondition
where
    V: EncodeValue,
    F: FnOnce(Vec<u8>) -> (Bound<Vec<u8>>, Bound<Vec<u8>>),
{
    match encode_orderable(value) {
        Ok(bytes) => {
            let (lower, upper) = bounds(bytes);
            RangeCondition::single(ValuePair::new(lower, upper), V::KIND)
        }
        Err(err) => RangeCondition::failed(err),
    }
}

fn bound(bytes: Vec<u8>, inclusive: bool) -> Bound<Vec<u8>> {
    if inclusive {
        Bound::Included(bytes)
    } else {
        Bound::Excluded(bytes)
    }
}

/// Values strictly greater than `value`.
pub fn gt<V: EncodeValue>(value: V) -> RangeCondition {
    anchored(&value, |v| (Bound::Excluded(v), Bound::Unbounded))
}

/// Values greater than or equal to `value`.
pub fn ge<V: EncodeValue>(value: V) -> RangeCondition {
    anchored(&value, |v| (Bound::Included(v), Bound::Unbounded))
}

/// Values strictly less than `value`.
pub fn lt<V: EncodeValue>(value: V) -> RangeCondition {
    anchored(&value, |v| (Bound::Unbounded, Bound::Excluded(v)))
}

/// Values less than or equal to `value`.
pub fn le<V: EncodeValue>(value: V) -> RangeCondition {
    anchored(&value, |v| (Bound::Unbounded, Bound::Included(v)))
}

/// Values between `min` and `max`, each end open or closed.
///
/// `min > max`, or equal ends that are not both closed, give the empty set.
/// Ends of different kinds give a sticky kind-mismatch error.
pub fn between<A, B>(min: A, min_inclusive: bool, max: B, max_inclusive: bool) -> RangeCondition
where
    A: EncodeValue,
    B: EncodeValue,
{
    if A::KIND != B::KIND {
        return RangeCondition::failed(ConditionError::KindMismatch {
            left: A::KIND,
            right: B::KIND,
        });
    }

    let lower = match encode_orderable(&min) {
        Ok(bytes) => bound(bytes, min_inclusive),
        Err(err) => return RangeCondition::failed(err),
    };
    let upper = match encode_orderable(&max) {
        Ok(bytes) => bound(bytes, max_inclusive),
        Err(err) => return RangeCondition::failed(err),
    };

    RangeCondition::single(ValuePair::new(lower, upper), A::KIND)
}

/// Values equal to `value`.
pub fn eq<V: EncodeValue>(value: V) -> EqualCondition {
    EqualCondition::new(&value)
}
