//! Module: db::index
//! Responsibility: secondary index buckets and their posting lists.
//! Does not own: scan planning or the primary record write.
//! Boundary: written by executors on every record write, read by index scans.

mod maintain;
mod posting;
mod rebuild;

#[cfg(test)]
mod tests;

pub use maintain::{IndexDelta, index_insert, index_remove, index_update};
pub use posting::{PostingList, PostingListError};
pub use rebuild::rebuild_index;

pub(crate) use maintain::{IndexRow, apply as apply_index_rows};

/// Prefix shared by every index bucket name.
pub const INDEX_BUCKET_PREFIX: &str = "_index";

/// Bucket holding the index over `field` of record type `entity`.
#[must_use]
pub fn index_bucket_name(entity: &str, field: &str) -> String {
    format!("{INDEX_BUCKET_PREFIX}:{entity}:{field}")
}
