use crate::{
    config::DbConfig,
    db::{
        data::decode_row,
        index::PostingList,
        store::{Cursor, WriteTx},
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
    traits::EntityKind,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Drop and repopulate one index bucket from the primary bucket.
///
/// Used after declaring an index over records that already exist.
/// Returns the number of index entries written.
pub fn rebuild_index<E, T>(tx: &mut T, field: &str, config: &DbConfig) -> Result<usize, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    let index = E::MODEL
        .index(field)
        .ok_or_else(|| InternalError::index_not_found(E::MODEL.name, field))?;
    let bucket = E::MODEL.index_bucket(index);

    // ------------------------------------------------------------------
    // Phase 1: collect postings from authoritative rows
    // ------------------------------------------------------------------
    let mut entries: BTreeMap<Vec<u8>, PostingList> = BTreeMap::new();
    if let Some(mut cursor) = tx.cursor(E::MODEL.data_bucket())? {
        let mut next = cursor.first();
        while let Some((key, bytes)) = next {
            let entity: E = decode_row(&key, &bytes, config)?;

            if let Some(value) = entity.index_value(index)? {
                let list = entries.entry(value).or_default();
                list.push(&key);

                if index.unique && list.len() > 1 {
                    return Err(InternalError::new(
                        ErrorClass::Conflict,
                        ErrorOrigin::Index,
                        format!(
                            "unique index '{bucket}' rebuild encountered {} keys",
                            list.len()
                        ),
                    ));
                }
            }

            next = cursor.next();
        }
    }

    // ------------------------------------------------------------------
    // Phase 2: replace the bucket
    // ------------------------------------------------------------------
    tx.delete_bucket(&bucket)?;
    for (value, list) in &entries {
        tx.put(&bucket, value, list.encode(config.max_posting_keys)?)?;
    }

    if config.debug {
        debug!(entity = E::MODEL.name, index = field, entries = entries.len(), "index rebuilt");
    }

    Ok(entries.len())
}
