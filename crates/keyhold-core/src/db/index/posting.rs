//! Module: index::posting
//! Responsibility: posting-list payload encode/decode and structural validation.
//! Does not own: which bucket or value the list is stored under.
//! Boundary: index maintenance and index scans consume decoded lists.

use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    serialize::{self, SerializeError},
};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

///
/// PostingListError
///

#[derive(Debug, ThisError)]
pub enum PostingListError {
    #[error("posting list exceeds max keys: {keys} (limit {max})")]
    TooManyKeys { keys: usize, max: usize },

    #[error("posting list contains zero keys")]
    Empty,

    #[error("posting list contains duplicate key")]
    DuplicateKey,

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

impl PostingListError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::TooManyKeys { .. } => ErrorClass::Unsupported,
            Self::Empty | Self::DuplicateKey => ErrorClass::Corruption,
            Self::Serialize(err) => err.class(),
        }
    }
}

impl From<PostingListError> for InternalError {
    fn from(err: PostingListError) -> Self {
        Self::new(err.class(), ErrorOrigin::Index, err.to_string())
    }
}

///
/// PostingList
///
/// Primary keys stored under one index value, in insertion order.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PostingList {
    keys: Vec<ByteBuf>,
}

impl PostingList {
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.keys.iter().any(|k| k.as_slice() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.keys.iter().map(|k| k.as_slice())
    }

    /// Append a key; returns `false` when it was already present.
    pub fn push(&mut self, key: &[u8]) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(ByteBuf::from(key.to_vec()));

        true
    }

    /// Remove a key; returns `false` when it was absent.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        match self.keys.iter().position(|k| k.as_slice() == key) {
            Some(pos) => {
                self.keys.remove(pos);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn into_keys(self) -> Vec<Vec<u8>> {
        self.keys.into_iter().map(ByteBuf::into_vec).collect()
    }

    /// Encode for storage, refusing lists over `max_keys`.
    pub fn encode(&self, max_keys: usize) -> Result<Vec<u8>, PostingListError> {
        if self.keys.len() > max_keys {
            return Err(PostingListError::TooManyKeys {
                keys: self.keys.len(),
                max: max_keys,
            });
        }

        Ok(serialize::serialize(self)?)
    }

    /// Decode a stored list. Stored lists are never empty and never repeat a key.
    pub fn decode(bytes: &[u8], max_bytes: usize) -> Result<Self, PostingListError> {
        let list: Self = serialize::deserialize_bounded(bytes, max_bytes)?;

        if list.is_empty() {
            return Err(PostingListError::Empty);
        }
        let unique = {
            let mut seen = BTreeSet::new();
            list.iter().all(|key| seen.insert(key))
        };
        if !unique {
            return Err(PostingListError::DuplicateKey);
        }

        Ok(list)
    }
}

///
/// TESTS
///
