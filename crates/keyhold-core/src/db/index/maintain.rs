//! Module: index::maintain
//! Responsibility: keep posting lists in step with record writes.
//! Does not own: the primary record write or transaction commit.
//! Boundary: executors call this inside the same write transaction as the row.

use crate::{
    config::DbConfig,
    db::{
        index::PostingList,
        store::{ReadTx, WriteTx},
    },
    error::InternalError,
    model::index::IndexModel,
    obs::sink::{self, MetricsEvent},
    traits::EntityKind,
};

///
/// IndexDelta
/// Posting-list edits made by one maintenance call.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IndexDelta {
    pub inserts: u64,
    pub removes: u64,
}

impl IndexDelta {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inserts == 0 && self.removes == 0
    }
}

///
/// IndexRow
/// A record's encoded key plus its encoded value for every declared index,
/// in model order. `None` means the record is not indexed there.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct IndexRow {
    key: Vec<u8>,
    values: Vec<Option<Vec<u8>>>,
}

impl IndexRow {
    pub(crate) fn of<E: EntityKind>(entity: &E) -> Result<Self, InternalError> {
        let key = entity.encoded_key()?;
        let values = E::MODEL
            .indexes
            .iter()
            .map(|index| entity.index_value(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { key, values })
    }

    pub(crate) fn key(&self) -> &[u8] {
        &self.key
    }

    fn entry(&self, slot: usize) -> Option<(&[u8], &[u8])> {
        self.values
            .get(slot)
            .and_then(Option::as_deref)
            .map(|value| (value, self.key.as_slice()))
    }
}

/// Index a newly written record.
pub fn index_insert<E, T>(tx: &mut T, entity: &E, config: &DbConfig) -> Result<IndexDelta, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    let row = IndexRow::of(entity)?;
    apply::<E, T>(tx, None, Some(&row), config)
}

/// Move a record's postings from its old field values to its new ones.
pub fn index_update<E, T>(
    tx: &mut T,
    old: &E,
    new: &E,
    config: &DbConfig,
) -> Result<IndexDelta, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    let old = IndexRow::of(old)?;
    let new = IndexRow::of(new)?;
    apply::<E, T>(tx, Some(&old), Some(&new), config)
}

/// Drop a deleted record from every posting list it appears in.
pub fn index_remove<E, T>(tx: &mut T, entity: &E, config: &DbConfig) -> Result<IndexDelta, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    let row = IndexRow::of(entity)?;
    apply::<E, T>(tx, Some(&row), None, config)
}

/// Apply the posting-list difference between two index rows.
pub(crate) fn apply<E, T>(
    tx: &mut T,
    old: Option<&IndexRow>,
    new: Option<&IndexRow>,
    config: &DbConfig,
) -> Result<IndexDelta, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    let mut delta = IndexDelta::default();

    for (slot, index) in E::MODEL.indexes.iter().enumerate() {
        let before = old.and_then(|row| row.entry(slot));
        let after = new.and_then(|row| row.entry(slot));
        if before == after {
            continue;
        }

        let bucket = E::MODEL.index_bucket(index);
        if let Some((value, key)) = before
            && remove_posting(tx, &bucket, value, key, config)?
        {
            delta.removes += 1;
        }
        if let Some((value, key)) = after
            && add_posting::<E, T>(tx, &bucket, index, value, key, config)?
        {
            delta.inserts += 1;
        }
    }

    if !delta.is_empty() {
        sink::record(MetricsEvent::IndexDelta {
            entity: E::MODEL.name,
            inserts: delta.inserts,
            removes: delta.removes,
        });
    }

    Ok(delta)
}

fn load_posting<T: ReadTx>(
    tx: &T,
    bucket: &str,
    value: &[u8],
    config: &DbConfig,
) -> Result<Option<PostingList>, InternalError> {
    match tx.get(bucket, value)? {
        Some(bytes) => Ok(Some(PostingList::decode(&bytes, config.max_value_bytes)?)),
        None => Ok(None),
    }
}

fn add_posting<E, T>(
    tx: &mut T,
    bucket: &str,
    index: &IndexModel,
    value: &[u8],
    key: &[u8],
    config: &DbConfig,
) -> Result<bool, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    let mut list = load_posting(tx, bucket, value, config)?.unwrap_or_default();

    if index.unique && !list.is_empty() && !list.contains(key) {
        sink::record(MetricsEvent::UniqueViolation {
            entity: E::MODEL.name,
        });
        return Err(InternalError::index_violation(E::MODEL.name, index.field));
    }
    if !list.push(key) {
        return Ok(false);
    }

    tx.put(bucket, value, list.encode(config.max_posting_keys)?)?;

    Ok(true)
}

fn remove_posting<T: WriteTx>(
    tx: &mut T,
    bucket: &str,
    value: &[u8],
    key: &[u8],
    config: &DbConfig,
) -> Result<bool, InternalError> {
    let Some(mut list) = load_posting(tx, bucket, value, config)? else {
        return Ok(false);
    };
    if !list.remove(key) {
        return Ok(false);
    }

    if list.is_empty() {
        tx.delete(bucket, value)?;
    } else {
        tx.put(bucket, value, list.encode(config.max_posting_keys)?)?;
    }

    Ok(true)
}
