use crate::{
    config::DbConfig,
    db::{
        codec::EncodeValue,
        data::encode_row,
        executor::load::load_row,
        index::{IndexRow, apply_index_rows},
        store::WriteTx,
    },
    error::InternalError,
    obs::sink::{ExecKind, Span},
    traits::EntityKind,
};

///
/// SaveMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SaveMode {
    Insert,
    Upsert,
}

/// Store a new record. Fails with a conflict when the key is taken.
pub fn insert<E, T>(tx: &mut T, entity: &E, config: &DbConfig) -> Result<(), InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    save(tx, entity, config, SaveMode::Insert).map(|_| ())
}

/// Store a record, replacing whatever lives under its key.
/// Returns the replaced record, if any.
pub fn upsert<E, T>(tx: &mut T, entity: &E, config: &DbConfig) -> Result<Option<E>, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    save(tx, entity, config, SaveMode::Upsert)
}

fn save<E, T>(tx: &mut T, entity: &E, config: &DbConfig, mode: SaveMode) -> Result<Option<E>, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    let mut span = Span::<E>::new(ExecKind::Save);

    let row = IndexRow::of(entity)?;
    let old: Option<E> = load_row(&*tx, row.key(), config)?;
    if mode == SaveMode::Insert && old.is_some() {
        return Err(InternalError::executor_conflict(format!(
            "key already exists: {} ({})",
            E::MODEL.name,
            E::MODEL.primary_key
        )));
    }

    let old_row = old.as_ref().map(IndexRow::of).transpose()?;
    let bytes = encode_row(entity, config)?;

    // index first so a unique violation leaves the row untouched
    apply_index_rows::<E, T>(tx, old_row.as_ref(), Some(&row), config)?;
    tx.put(E::MODEL.data_bucket(), row.key(), bytes)?;

    span.set_rows(1);

    Ok(old)
}

/// Delete the record stored under `key`, returning it.
pub fn delete<E, T>(tx: &mut T, key: &E::Key, config: &DbConfig) -> Result<Option<E>, InternalError>
where
    E: EntityKind,
    T: WriteTx,
{
    let mut span = Span::<E>::new(ExecKind::Delete);

    let key = key.encode_value()?;
    let Some(entity) = load_row::<E, T>(&*tx, &key, config)? else {
        return Ok(None);
    };

    let row = IndexRow::of(&entity)?;
    apply_index_rows::<E, T>(tx, Some(&row), None, config)?;
    tx.delete(E::MODEL.data_bucket(), &key)?;

    span.set_rows(1);

    Ok(Some(entity))
}
