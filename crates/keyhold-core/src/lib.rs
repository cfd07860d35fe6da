//! Core runtime for Keyhold: the ordered value codec, interval algebra,
//! secondary index maintenance and the query executors, all running inside
//! caller-supplied transactions of an ordered key-value store.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod serialize;
pub mod traits;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Domain vocabulary for declaring record types and building queries.
/// No executors, stores, or serializers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{
            codec::{Opaque, ValueKind},
            condition::{RangeCondition, between, eq, ge, gt, le, lt},
            direction::Direction,
            query::Query,
        },
        model::{entity::EntityModel, index::IndexModel},
        traits::{EntityKind, index_field},
    };
}
