use super::{
    IndexDelta, PostingList, index_bucket_name, index_insert, index_remove, index_update,
    rebuild_index,
};
use crate::{
    config::DbConfig,
    db::{
        codec::encode,
        data::encode_row,
        store::{MemoryStore, ReadTx, Store, WriteTx},
    },
    error::ErrorClass,
    test_support::{Account, FileInfo},
    traits::EntityKind,
};

fn postings<T: ReadTx>(tx: &T, entity: &str, field: &str, value: &[u8]) -> Option<Vec<Vec<u8>>> {
    tx.get(&index_bucket_name(entity, field), value)
        .unwrap()
        .map(|bytes| PostingList::decode(&bytes, 1 << 20).unwrap().into_keys())
}

fn text(value: &str) -> Vec<u8> {
    encode(value).unwrap()
}

#[test]
fn bucket_names_are_exact() {
    assert_eq!(index_bucket_name("FileInfo", "bind_name"), "_index:FileInfo:bind_name");
    assert_eq!(
        FileInfo::MODEL.index_bucket(&FileInfo::MODEL.indexes[1]),
        "_index:FileInfo:last_access_time"
    );
}

#[test]
fn insert_appends_to_shared_posting_list() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();

    let delta = index_insert(&mut tx, &FileInfo::new("h1", "alpha", 10), &config).unwrap();
    assert_eq!(delta, IndexDelta { inserts: 3, removes: 0 });
    index_insert(&mut tx, &FileInfo::new("h2", "alpha", 11), &config).unwrap();

    assert_eq!(
        postings(&tx, "FileInfo", "bind_name", &text("alpha")),
        Some(vec![text("h1"), text("h2")])
    );
    assert_eq!(
        postings(&tx, "FileInfo", "last_access_time", &encode(&11i64).unwrap()),
        Some(vec![text("h2")])
    );
}

#[test]
fn repeated_insert_is_idempotent() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();
    let file = FileInfo::new("h1", "alpha", 10);

    index_insert(&mut tx, &file, &config).unwrap();
    let delta = index_insert(&mut tx, &file, &config).unwrap();

    assert!(delta.is_empty());
    assert_eq!(
        postings(&tx, "FileInfo", "bind_name", &text("alpha")),
        Some(vec![text("h1")])
    );
}

#[test]
fn update_moves_key_and_prunes_emptied_entry() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();

    let old = FileInfo::new("h1", "alpha", 10);
    let mut new = old.clone();
    new.bind_name = "beta".to_string();

    index_insert(&mut tx, &old, &config).unwrap();
    let delta = index_update(&mut tx, &old, &new, &config).unwrap();

    assert_eq!(delta, IndexDelta { inserts: 1, removes: 1 });
    assert_eq!(postings(&tx, "FileInfo", "bind_name", &text("alpha")), None);
    assert_eq!(
        postings(&tx, "FileInfo", "bind_name", &text("beta")),
        Some(vec![text("h1")])
    );
}

#[test]
fn update_with_unchanged_values_is_a_no_op() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();

    let old = FileInfo::new("h1", "alpha", 10);
    let mut new = old.clone();
    new.file_size = 99;

    index_insert(&mut tx, &old, &config).unwrap();
    assert!(index_update(&mut tx, &old, &new, &config).unwrap().is_empty());
}

#[test]
fn remove_keeps_other_keys_and_tolerates_absence() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();

    let a = FileInfo::new("h1", "alpha", 10);
    let b = FileInfo::new("h2", "alpha", 10);
    index_insert(&mut tx, &a, &config).unwrap();
    index_insert(&mut tx, &b, &config).unwrap();

    index_remove(&mut tx, &a, &config).unwrap();
    assert_eq!(
        postings(&tx, "FileInfo", "bind_name", &text("alpha")),
        Some(vec![text("h2")])
    );

    let delta = index_remove(&mut tx, &a, &config).unwrap();
    assert!(delta.is_empty());
}

#[test]
fn unique_index_rejects_a_second_key() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();

    index_insert(&mut tx, &Account::new(1, "a@x"), &config).unwrap();
    let err = index_insert(&mut tx, &Account::new(2, "a@x"), &config).expect_err("duplicate email");

    assert!(err.is_class(ErrorClass::Conflict));
}

#[test]
fn unique_index_allows_value_to_move_between_records() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();

    let old = Account::new(1, "a@x");
    let mut new = old.clone();
    new.email = "b@x".to_string();
    index_insert(&mut tx, &old, &config).unwrap();
    index_update(&mut tx, &old, &new, &config).unwrap();

    index_insert(&mut tx, &Account::new(2, "a@x"), &config).expect("email freed");
}

#[test]
fn absent_field_is_not_indexed() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();

    let mut account = Account::new(1, "a@x");
    index_insert(&mut tx, &account, &config).unwrap();
    assert!(!tx.bucket_exists("_index:Account:nickname").unwrap());

    let old = account.clone();
    account.nickname = Some("ace".to_string());
    index_update(&mut tx, &old, &account, &config).unwrap();
    assert!(tx.bucket_exists("_index:Account:nickname").unwrap());
}

#[test]
fn posting_limit_is_enforced() {
    let store = MemoryStore::new();
    let config = DbConfig::default().with_max_posting_keys(1);
    let mut tx = store.begin_write().unwrap();

    index_insert(&mut tx, &FileInfo::new("h1", "alpha", 1), &config).unwrap();
    let err = index_insert(&mut tx, &FileInfo::new("h2", "alpha", 2), &config).expect_err("limit");

    assert!(err.is_class(ErrorClass::Unsupported));
}

#[test]
fn rebuild_repopulates_from_rows() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();

    for file in [
        FileInfo::new("h1", "alpha", 1),
        FileInfo::new("h2", "beta", 2),
        FileInfo::new("h3", "alpha", 3),
    ] {
        let key = file.encoded_key().unwrap();
        tx.put("FileInfo", &key, encode_row(&file, &config).unwrap())
            .unwrap();
    }
    // stale entry that no row backs
    tx.put("_index:FileInfo:bind_name", &text("ghost"), vec![0])
        .unwrap();

    let written = rebuild_index::<FileInfo, _>(&mut tx, "bind_name", &config).unwrap();

    assert_eq!(written, 2);
    assert_eq!(
        postings(&tx, "FileInfo", "bind_name", &text("alpha")),
        Some(vec![text("h1"), text("h3")])
    );
    assert_eq!(tx.get("_index:FileInfo:bind_name", &text("ghost")).unwrap(), None);
}

#[test]
fn rebuild_of_unknown_index_is_not_found() {
    let store = MemoryStore::new();
    let mut tx = store.begin_write().unwrap();

    let err = rebuild_index::<FileInfo, _>(&mut tx, "nope", &DbConfig::default()).expect_err("unknown");
    assert!(err.is_class(ErrorClass::NotFound));
}

#[test]
fn rebuild_detects_unique_conflict() {
    let store = MemoryStore::new();
    let config = DbConfig::default();
    let mut tx = store.begin_write().unwrap();

    for account in [Account::new(1, "same"), Account::new(2, "same")] {
        let key = account.encoded_key().unwrap();
        tx.put("Account", &key, encode_row(&account, &config).unwrap())
            .unwrap();
    }

    let err = rebuild_index::<Account, _>(&mut tx, "email", &config).expect_err("conflict");
    assert!(err.is_class(ErrorClass::Conflict));
}
