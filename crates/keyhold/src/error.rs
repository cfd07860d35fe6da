use derive_more::Display;
use keyhold_core::error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match (err.class, err.origin) {
            (ErrorClass::NotFound, _) => ErrorKind::Query(QueryErrorKind::NotFound),
            (ErrorClass::TypeMismatch, _) => ErrorKind::Query(QueryErrorKind::TypeMismatch),
            (ErrorClass::Unsupported, _) => ErrorKind::Query(QueryErrorKind::Unsupported),
            (ErrorClass::Validation, CoreErrorOrigin::Executor) => {
                ErrorKind::Update(UpdateErrorKind::ConstraintViolation)
            }
            (ErrorClass::Validation, _) => ErrorKind::Query(QueryErrorKind::Invalid),
            (ErrorClass::Conflict, _) => ErrorKind::Update(UpdateErrorKind::Conflict),
            (ErrorClass::Corruption, _) => ErrorKind::Store(StoreErrorKind::Corrupt),
            (ErrorClass::Internal, CoreErrorOrigin::Store) => {
                ErrorKind::Store(StoreErrorKind::Unavailable)
            }
            (ErrorClass::Internal | ErrorClass::InvariantViolation, _) => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Query(QueryErrorKind),
    Update(UpdateErrorKind),
    Store(StoreErrorKind),

    /// The caller cannot remediate this.
    Internal,
}

///
/// QueryErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// Query or config shape is invalid.
    Invalid,

    /// Predicate, exclusion or field value has the wrong kind for its target.
    TypeMismatch,

    /// A value cannot be encoded (NaN, oversized record, non-orderable range).
    Unsupported,

    /// The referenced index does not exist.
    NotFound,
}

///
/// UpdateErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum UpdateErrorKind {
    /// Update tried to change something it may not, such as the primary key.
    ConstraintViolation,

    /// Key already taken or unique index already owned.
    Conflict,
}

///
/// StoreErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    /// Stored bytes failed to decode or disagree with each other.
    Corrupt,
    Unavailable,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Codec,
    Config,
    Executor,
    Index,
    Query,
    Serialize,
    Store,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Codec => Self::Codec,
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Executor => Self::Executor,
            CoreErrorOrigin::Index => Self::Index,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Store => Self::Store,
        }
    }
}
