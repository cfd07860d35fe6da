use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every subsystem error converts into this type at the executor boundary.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// True when this error carries the given class.
    #[must_use]
    pub fn is_class(&self, class: ErrorClass) -> bool {
        self.class == class
    }

    /// Construct an executor-origin validation error.
    pub(crate) fn executor_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Validation, ErrorOrigin::Executor, message)
    }

    /// Construct an executor-origin conflict.
    pub(crate) fn executor_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Conflict, ErrorOrigin::Executor, message)
    }

    /// Construct a lookup error for an index the entity does not declare.
    pub(crate) fn index_not_found(entity: &str, field: &str) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Index,
            format!("index not found: {entity} ({field})"),
        )
    }

    /// Construct a store-origin corruption error.
    pub(crate) fn store_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Store, message)
    }

    /// Construct an index uniqueness violation conflict error.
    pub(crate) fn index_violation(entity: &str, field: &str) -> Self {
        Self::new(
            ErrorClass::Conflict,
            ErrorOrigin::Index,
            format!("index constraint violation: {entity} ({field})"),
        )
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    NotFound,
    Internal,
    Conflict,
    Unsupported,
    InvariantViolation,
    TypeMismatch,
    Validation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
            Self::TypeMismatch => "type_mismatch",
            Self::Validation => "validation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Codec,
    Config,
    Serialize,
    Store,
    Index,
    Query,
    Executor,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Codec => "codec",
            Self::Config => "config",
            Self::Serialize => "serialize",
            Self::Store => "store",
            Self::Index => "index",
            Self::Query => "query",
            Self::Executor => "executor",
        };
        write!(f, "{label}")
    }
}
