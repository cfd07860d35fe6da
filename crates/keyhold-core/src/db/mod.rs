pub mod codec;
pub mod condition;
pub mod direction;
pub mod executor;
pub mod index;
pub mod query;
pub mod store;

pub(crate) mod data;

use crate::{
    config::{ConfigError, DbConfig},
    db::{
        query::Query,
        store::{MemoryStore, Store, WriteTx},
    },
    error::InternalError,
    traits::EntityKind,
};

///
/// Db
///
/// A store plus the runtime config every operation runs with.
///
/// Each method opens its own transaction: reads on a snapshot, writes
/// committed only when the whole call succeeds. To group several
/// operations in one transaction, open it through [`Db::store`] and call the
/// [`executor`] functions directly.
///

pub struct Db<S: Store> {
    store: S,
    config: DbConfig,
}

impl Db<MemoryStore> {
    /// Fresh in-memory database with default config.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: Store> Db<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: DbConfig::default(),
        }
    }

    pub fn with_config(store: S, config: DbConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self { store, config })
    }

    /// Enable debug logging for subsequent operations on this handle.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &DbConfig {
        &self.config
    }

    //
    // Reads
    //

    /// Encoded primary keys matching `query`, in scan order.
    pub fn keys<E: EntityKind>(&self, query: &Query) -> Result<Vec<Vec<u8>>, InternalError> {
        let tx = self.store.begin_read()?;

        executor::execute(&tx, E::MODEL, query, &self.config)
    }

    pub fn find<E: EntityKind>(&self, query: &Query) -> Result<Vec<E>, InternalError> {
        let tx = self.store.begin_read()?;

        executor::find(&tx, query, &self.config)
    }

    pub fn find_one<E: EntityKind>(&self, query: &Query) -> Result<Option<E>, InternalError> {
        let tx = self.store.begin_read()?;

        executor::find_one(&tx, query, &self.config)
    }

    pub fn count<E: EntityKind>(&self, query: &Query) -> Result<usize, InternalError> {
        let tx = self.store.begin_read()?;

        executor::count::<E, _>(&tx, query, &self.config)
    }

    pub fn get<E: EntityKind>(&self, key: &E::Key) -> Result<Option<E>, InternalError> {
        let tx = self.store.begin_read()?;

        executor::get(&tx, key, &self.config)
    }

    //
    // Writes
    //

    pub fn insert<E: EntityKind>(&self, entity: &E) -> Result<(), InternalError> {
        let mut tx = self.store.begin_write()?;
        executor::insert(&mut tx, entity, &self.config)?;
        tx.commit()?;

        Ok(())
    }

    pub fn upsert<E: EntityKind>(&self, entity: &E) -> Result<Option<E>, InternalError> {
        let mut tx = self.store.begin_write()?;
        let old = executor::upsert(&mut tx, entity, &self.config)?;
        tx.commit()?;

        Ok(old)
    }

    pub fn delete<E: EntityKind>(&self, key: &E::Key) -> Result<Option<E>, InternalError> {
        let mut tx = self.store.begin_write()?;
        let old = executor::delete::<E, _>(&mut tx, key, &self.config)?;
        tx.commit()?;

        Ok(old)
    }

    /// Rewrite every record matching `query` through `f`.
    /// Nothing is committed if `f` fails for any record.
    pub fn update_matching<E, F>(&self, query: &Query, f: F) -> Result<usize, InternalError>
    where
        E: EntityKind,
        F: FnMut(&mut E) -> Result<(), InternalError>,
    {
        let mut tx = self.store.begin_write()?;
        let updated = executor::update_matching::<E, _, _>(&mut tx, query, &self.config, f)?;
        tx.commit()?;

        Ok(updated)
    }

    pub fn delete_matching<E: EntityKind>(&self, query: &Query) -> Result<usize, InternalError> {
        let mut tx = self.store.begin_write()?;
        let deleted = executor::delete_matching::<E, _>(&mut tx, query, &self.config)?;
        tx.commit()?;

        Ok(deleted)
    }

    /// Rebuild the index over `field` from the stored records.
    pub fn rebuild_index<E: EntityKind>(&self, field: &str) -> Result<usize, InternalError> {
        let mut tx = self.store.begin_write()?;
        let entries = index::rebuild_index::<E, _>(&mut tx, field, &self.config)?;
        tx.commit()?;

        Ok(entries)
    }
}
