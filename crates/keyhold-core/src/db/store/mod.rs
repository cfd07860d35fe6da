//! Module: db::store
//! Responsibility: the transactional ordered key-value contract the query layer runs on.
//! Does not own: durability, paging, or crash recovery.
//! Boundary: executors and index maintenance only touch storage through these traits.

mod memory;

pub use memory::{MemoryCursor, MemoryRead, MemoryStore, MemoryWrite};

use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use thiserror::Error as ThisError;

/// One stored `(key, value)` pair.
pub type Entry = (Vec<u8>, Vec<u8>);

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("bucket name must not be empty")]
    EmptyBucketName,

    #[error("key must not be empty (bucket '{bucket}')")]
    EmptyKey { bucket: String },

    #[error("storage engine failure: {0}")]
    Engine(String),
}

impl StoreError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyBucketName | Self::EmptyKey { .. } => ErrorClass::Validation,
            Self::Engine(_) => ErrorClass::Internal,
        }
    }
}

impl From<StoreError> for InternalError {
    fn from(err: StoreError) -> Self {
        Self::new(err.class(), ErrorOrigin::Store, err.to_string())
    }
}

///
/// Cursor
///
/// Bidirectional position inside one bucket, ordered by key bytes.
/// Every move returns the entry it lands on, or `None` when it runs off
/// either end.
///

#[allow(clippy::should_implement_trait)]
pub trait Cursor {
    fn first(&mut self) -> Option<Entry>;

    fn last(&mut self) -> Option<Entry>;

    /// Move to the first key `>= key`.
    fn seek(&mut self, key: &[u8]) -> Option<Entry>;

    fn next(&mut self) -> Option<Entry>;

    /// Step back. After running off the end, this lands on the last key.
    fn prev(&mut self) -> Option<Entry>;
}

///
/// ReadTx
///

pub trait ReadTx {
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError>;

    fn get(&self, bucket: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Cursor over a bucket, or `None` when the bucket does not exist.
    fn cursor(&self, bucket: &str) -> Result<Option<Self::Cursor<'_>>, StoreError>;
}

///
/// WriteTx
///
/// Writes are visible to this transaction immediately and to others only
/// after `commit`. Dropping without committing discards them.
///

pub trait WriteTx: ReadTx {
    /// Insert or overwrite, creating the bucket on first use.
    fn put(&mut self, bucket: &str, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove a key; returns whether it was present.
    fn delete(&mut self, bucket: &str, key: &[u8]) -> Result<bool, StoreError>;

    /// Remove a bucket and all of its keys; returns whether it existed.
    fn delete_bucket(&mut self, bucket: &str) -> Result<bool, StoreError>;

    fn commit(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

///
/// Store
///

pub trait Store {
    type Read<'a>: ReadTx
    where
        Self: 'a;

    type Write<'a>: WriteTx
    where
        Self: 'a;

    fn begin_read(&self) -> Result<Self::Read<'_>, StoreError>;

    /// Open the single writer. Blocks while another writer is open.
    fn begin_write(&self) -> Result<Self::Write<'_>, StoreError>;
}
