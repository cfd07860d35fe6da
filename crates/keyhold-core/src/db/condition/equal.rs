use crate::db::{
    codec::{EncodeValue, ValueKind},
    condition::ConditionError,
};

///
/// EqualCondition
///
/// One encoded value matched exactly. Works for every kind, opaque included.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EqualCondition {
    value: Vec<u8>,
    kind: ValueKind,
    error: Option<ConditionError>,
}

impl EqualCondition {
    pub fn new<V: EncodeValue + ?Sized>(value: &V) -> Self {
        match value.encode_value() {
            Ok(bytes) => Self {
                value: bytes,
                kind: V::KIND,
                error: None,
            },
            Err(err) => Self {
                value: Vec::new(),
                kind: V::KIND,
                error: Some(ConditionError::Encode(err)),
            },
        }
    }

    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn check(&self) -> Result<(), ConditionError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
