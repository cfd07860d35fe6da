//! Module: db::query
//! Responsibility: query intent and its validation into an access plan.
//! Does not own: cursor traversal or row decoding.
//! Boundary: executors only run plans produced by `check_query`.

mod plan;
mod query;


pub use plan::{Access, AccessPlan, AccessSource, check_query};
pub use query::{Predicate, Query, QueryTarget};

use crate::{
    db::{
        codec::{CodecError, ValueKind},
        condition::ConditionError,
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use thiserror::Error as ThisError;

///
/// QueryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("index not found: {entity} ({field})")]
    UnknownIndex { entity: &'static str, field: String },

    #[error("invalid predicate: {0}")]
    Condition(ConditionError),

    #[error("exclusion value failed to encode: {0}")]
    Exclude(CodecError),

    #[error("exclusion values mix kinds: {left} vs {right}")]
    ExcludeKindMismatch { left: ValueKind, right: ValueKind },

    #[error("{what} kind {found} does not match target kind {expected}")]
    KindMismatch {
        what: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("range condition is not in canonical form")]
    NonCanonical,
}

impl QueryError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownIndex { .. } => ErrorClass::NotFound,
            Self::Condition(err) => err.class(),
            Self::Exclude(_) => ErrorClass::Validation,
            Self::ExcludeKindMismatch { .. } | Self::KindMismatch { .. } => ErrorClass::TypeMismatch,
            Self::NonCanonical => ErrorClass::InvariantViolation,
        }
    }

    const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::UnknownIndex { .. } => ErrorOrigin::Index,
            _ => ErrorOrigin::Query,
        }
    }
}

impl From<ConditionError> for QueryError {
    fn from(err: ConditionError) -> Self {
        Self::Condition(err)
    }
}

impl From<QueryError> for InternalError {
    fn from(err: QueryError) -> Self {
        Self::new(err.class(), err.origin(), err.to_string())
    }
}
