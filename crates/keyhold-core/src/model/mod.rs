//! Runtime schema descriptors.
//!
//! Record types declare these statically through `EntityKind::MODEL`; the
//! planner and index maintenance read them to find buckets, key kinds and
//! declared indexes.

pub mod entity;
pub mod index;
