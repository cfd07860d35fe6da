//! Record types shared by unit tests.

use crate::{
    db::codec::{CodecError, ValueKind},
    model::{entity::EntityModel, index::IndexModel},
    traits::{EntityKind, index_field},
};
use serde::{Deserialize, Serialize};

///
/// FileInfo
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct FileInfo {
    pub(crate) hash_key: String,
    pub(crate) bind_name: String,
    pub(crate) last_access_time: i64,
    pub(crate) file_size: i64,
    pub(crate) rate: f64,
}

impl FileInfo {
    pub(crate) fn new(hash_key: &str, bind_name: &str, last_access_time: i64) -> Self {
        Self {
            hash_key: hash_key.to_string(),
            bind_name: bind_name.to_string(),
            last_access_time,
            file_size: 0,
            rate: 0.0,
        }
    }
}

impl EntityKind for FileInfo {
    type Key = String;

    const MODEL: &'static EntityModel = &EntityModel::new(
        "FileInfo",
        "hash_key",
        ValueKind::Text,
        &[
            IndexModel::new("bind_name", ValueKind::Text, false),
            IndexModel::new("last_access_time", ValueKind::Int64, false),
            IndexModel::new("rate", ValueKind::Float64, false),
        ],
    );

    fn key(&self) -> String {
        self.hash_key.clone()
    }

    fn index_value(&self, index: &IndexModel) -> Result<Option<Vec<u8>>, CodecError> {
        match index.field {
            "bind_name" => index_field(index, self.bind_name.as_str()),
            "last_access_time" => index_field(index, &self.last_access_time),
            "rate" => index_field(index, &self.rate),
            _ => Ok(None),
        }
    }
}

///
/// Account
/// Unique email index; nickname is only indexed when present.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Account {
    pub(crate) id: u64,
    pub(crate) email: String,
    pub(crate) nickname: Option<String>,
}

impl Account {
    pub(crate) fn new(id: u64, email: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            nickname: None,
        }
    }
}

impl EntityKind for Account {
    type Key = u64;

    const MODEL: &'static EntityModel = &EntityModel::new(
        "Account",
        "id",
        ValueKind::Uint64,
        &[
            IndexModel::new("email", ValueKind::Text, true),
            IndexModel::new("nickname", ValueKind::Text, false),
        ],
    );

    fn key(&self) -> u64 {
        self.id
    }

    fn index_value(&self, index: &IndexModel) -> Result<Option<Vec<u8>>, CodecError> {
        match index.field {
            "email" => index_field(index, self.email.as_str()),
            "nickname" => match &self.nickname {
                Some(nickname) => index_field(index, nickname.as_str()),
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }
}
