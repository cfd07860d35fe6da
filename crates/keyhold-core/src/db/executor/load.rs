use crate::{
    config::DbConfig,
    db::{
        codec::EncodeValue,
        data::decode_row,
        executor::scan::scan_plan,
        query::{Query, check_query},
        store::ReadTx,
    },
    error::InternalError,
    model::entity::EntityModel,
    obs::sink::{self, ExecKind, MetricsEvent, Span},
    traits::EntityKind,
};
use tracing::debug;

/// Primary keys matching `query`, in scan order, after offset and limit.
pub fn execute<T: ReadTx>(
    tx: &T,
    model: &'static EntityModel,
    query: &Query,
    config: &DbConfig,
) -> Result<Vec<Vec<u8>>, InternalError> {
    let plan = check_query(model, query)?;
    sink::record(MetricsEvent::Plan {
        kind: plan.plan_kind(),
    });
    if config.debug {
        debug!(entity = model.name, plan = %plan.summary(), "query plan");
    }

    let output = scan_plan(tx, &plan, config)?;
    sink::record(MetricsEvent::RowsScanned {
        entity: model.name,
        rows_scanned: output.entries_visited,
    });
    if config.debug {
        debug!(
            entity = model.name,
            visited = output.entries_visited,
            matched = output.keys.len(),
            "query scan finished"
        );
    }

    Ok(output.keys)
}

/// Load the record stored under an encoded primary key.
pub(crate) fn load_row<E, T>(tx: &T, key: &[u8], config: &DbConfig) -> Result<Option<E>, InternalError>
where
    E: EntityKind,
    T: ReadTx,
{
    tx.get(E::MODEL.data_bucket(), key)?
        .map(|bytes| decode_row(key, &bytes, config))
        .transpose()
}

/// Load a record that a scan reported, treating absence as corruption.
pub(crate) fn load_matched<E, T>(tx: &T, key: &[u8], config: &DbConfig) -> Result<E, InternalError>
where
    E: EntityKind,
    T: ReadTx,
{
    load_row(tx, key, config)?.ok_or_else(|| {
        InternalError::store_corruption(format!(
            "index entry points at missing row {key:02x?} ({})",
            E::MODEL.name
        ))
    })
}

/// Records matching `query`, in scan order.
pub fn find<E, T>(tx: &T, query: &Query, config: &DbConfig) -> Result<Vec<E>, InternalError>
where
    E: EntityKind,
    T: ReadTx,
{
    let mut span = Span::<E>::new(ExecKind::Load);

    let keys = execute(tx, E::MODEL, query, config)?;
    let rows = keys
        .iter()
        .map(|key| load_matched(tx, key, config))
        .collect::<Result<Vec<E>, _>>()?;

    span.set_rows(rows.len() as u64);

    Ok(rows)
}

/// First record matching `query`, ignoring any limit it carries.
pub fn find_one<E, T>(tx: &T, query: &Query, config: &DbConfig) -> Result<Option<E>, InternalError>
where
    E: EntityKind,
    T: ReadTx,
{
    let query = query.clone().limit(1);

    Ok(find(tx, &query, config)?.into_iter().next())
}

/// Number of records matching `query`. Offset and limit are ignored.
pub fn count<E, T>(tx: &T, query: &Query, config: &DbConfig) -> Result<usize, InternalError>
where
    E: EntityKind,
    T: ReadTx,
{
    let query = query.clone().unpaged();

    Ok(execute(tx, E::MODEL, &query, config)?.len())
}

/// Record stored under a primary key.
pub fn get<E, T>(tx: &T, key: &E::Key, config: &DbConfig) -> Result<Option<E>, InternalError>
where
    E: EntityKind,
    T: ReadTx,
{
    let _span = Span::<E>::new(ExecKind::Load);
    let key = key.encode_value()?;

    load_row(tx, &key, config)
}
