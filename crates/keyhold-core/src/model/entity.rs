use crate::{
    db::{codec::ValueKind, index::index_bucket_name},
    model::index::IndexModel,
};

///
/// EntityModel
/// Static runtime model for one record type.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Record type name; also the primary bucket name.
    pub name: &'static str,
    /// Name of the primary key field (diagnostics only).
    pub primary_key: &'static str,
    /// Kind the primary key encodes as.
    pub key_kind: ValueKind,
    /// Declared secondary indexes, one per field.
    pub indexes: &'static [IndexModel],
}

impl EntityModel {
    #[must_use]
    pub const fn new(
        name: &'static str,
        primary_key: &'static str,
        key_kind: ValueKind,
        indexes: &'static [IndexModel],
    ) -> Self {
        Self {
            name,
            primary_key,
            key_kind,
            indexes,
        }
    }

    /// Bucket holding the encoded records.
    #[must_use]
    pub const fn data_bucket(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn index(&self, field: &str) -> Option<&IndexModel> {
        self.indexes.iter().find(|index| index.field == field)
    }

    #[must_use]
    pub fn index_bucket(&self, index: &IndexModel) -> String {
        index_bucket_name(self.name, index.field)
    }
}
