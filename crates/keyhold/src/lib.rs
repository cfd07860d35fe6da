//! ## Crate layout
//! - `core`: codec, interval algebra, index maintenance, executors, and observability.
//! - `error`: the public error type callers match on.
//!
//! The `prelude` module carries what record declarations and query code need.

pub use keyhold_core as core;

pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::{
    config::DbConfig,
    db::{
        Db,
        store::{MemoryStore, Store},
    },
};
pub use error::{Error, ErrorKind, ErrorOrigin};

///
/// Prelude
/// Types for declaring records and building queries. `Store` is imported
/// anonymously so `begin_read`/`begin_write` resolve without taking the name.
///

pub mod prelude {
    pub use crate::core::{
        db::{
            Db,
            codec::{Opaque, ValueKind},
            condition::{RangeCondition, between, eq, ge, gt, le, lt},
            direction::Direction,
            query::Query,
            store::{MemoryStore, Store as _},
        },
        model::{entity::EntityModel, index::IndexModel},
        traits::{EntityKind, index_field},
    };
    pub use serde::{Deserialize, Serialize};
}
