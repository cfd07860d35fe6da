use crate::db::codec::ValueKind;
use std::fmt::{self, Display};

///
/// IndexModel
/// Runtime descriptor for one single-field secondary index.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexModel {
    pub field: &'static str,
    pub kind: ValueKind,
    pub unique: bool,
}

impl IndexModel {
    #[must_use]
    pub const fn new(field: &'static str, kind: ValueKind, unique: bool) -> Self {
        Self {
            field,
            kind,
            unique,
        }
    }
}

impl Display for IndexModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unique {
            write!(f, "UNIQUE {}: {}", self.field, self.kind)
        } else {
            write!(f, "{}: {}", self.field, self.kind)
        }
    }
}
