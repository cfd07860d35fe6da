//! Module: executor::mutation
//! Responsibility: update and delete every record a query matches.
//! Does not own: transaction commit or rollback.
//! Boundary: the caller's write transaction is the unit of atomicity; an
//! error part way through leaves partial writes for the caller to discard.

use crate::{
    config::DbConfig,
    db::{
        data::encode_row,
        executor::load::{execute, load_matched},
        index::{IndexRow, apply_index_rows},
        query::Query,
        store::WriteTx,
    },
    error::InternalError,
    obs::sink::{ExecKind, Span},
    traits::EntityKind,
};

/// Apply `f` to every record matching `query` and rewrite it along with its
/// index entries. Returns the number of records updated.
///
/// `f` may change any field except the primary key.
pub fn update_matching<E, T, F>(
    tx: &mut T,
    query: &Query,
    config: &DbConfig,
    mut f: F,
) -> Result<usize, InternalError>
where
    E: EntityKind,
    T: WriteTx,
    F: FnMut(&mut E) -> Result<(), InternalError>,
{
    let mut span = Span::<E>::new(ExecKind::Update);

    // keys are collected up front so rewrites cannot feed back into the scan
    let keys = execute(&*tx, E::MODEL, query, config)?;

    for key in &keys {
        let mut entity: E = load_matched(&*tx, key, config)?;
        let before = IndexRow::of(&entity)?;

        f(&mut entity)?;

        let after = IndexRow::of(&entity)?;
        if after.key() != before.key() {
            return Err(InternalError::executor_validation(format!(
                "update changed primary key '{}' of {}",
                E::MODEL.primary_key,
                E::MODEL.name
            )));
        }

        tx.put(E::MODEL.data_bucket(), key, encode_row(&entity, config)?)?;
        apply_index_rows::<E, T>(tx, Some(&before), Some(&after), config)?;
    }

    span.set_rows(keys.len() as u64);

    Ok(keys.len())
}

/// Delete every record matching `query` and its index entries.
/// Returns the number of records deleted.
pub fn delete_matching<E, T>(tx: &mut T, query: &Query, config: &DbConfig) -> Result<usize, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    let mut span = Span::<E>::new(ExecKind::Delete);
    let keys = execute(&*tx, E::MODEL, query, config)?;

    for key in &keys {
        let entity: E = load_matched(&*tx, key, config)?;
        let row = IndexRow::of(&entity)?;

        apply_index_rows::<E, T>(tx, Some(&row), None, config)?;
        tx.delete(E::MODEL.data_bucket(), key)?;
    }

    span.set_rows(keys.len() as u64);

    Ok(keys.len())
}
