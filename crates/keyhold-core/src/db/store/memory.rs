use crate::db::store::{Cursor, Entry, ReadTx, Store, StoreError, WriteTx};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::{collections::BTreeMap, ops::Bound, sync::Arc};

type Bucket = BTreeMap<Vec<u8>, Vec<u8>>;
type Buckets = BTreeMap<String, Arc<Bucket>>;

///
/// MemoryStore
///
/// In-memory ordered store. Readers work on an immutable snapshot of the last
/// commit; one writer at a time edits a copy-on-write image that replaces
/// the snapshot on commit.
///

#[derive(Default)]
pub struct MemoryStore {
    committed: RwLock<Arc<Buckets>>,
    writer: Mutex<()>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Arc<Buckets> {
        Arc::clone(&self.committed.read())
    }
}

impl Store for MemoryStore {
    type Read<'a> = MemoryRead;
    type Write<'a> = MemoryWrite<'a>;

    fn begin_read(&self) -> Result<Self::Read<'_>, StoreError> {
        Ok(MemoryRead {
            buckets: self.snapshot(),
        })
    }

    fn begin_write(&self) -> Result<Self::Write<'_>, StoreError> {
        let guard = self.writer.lock();
        let working = (*self.snapshot()).clone();

        Ok(MemoryWrite {
            store: self,
            _guard: guard,
            buckets: working,
        })
    }
}

fn check_bucket(bucket: &str) -> Result<(), StoreError> {
    if bucket.is_empty() {
        return Err(StoreError::EmptyBucketName);
    }

    Ok(())
}

fn open_cursor(buckets: &Buckets, bucket: &str) -> Result<Option<MemoryCursor>, StoreError> {
    check_bucket(bucket)?;

    Ok(buckets.get(bucket).map(|b| MemoryCursor::new(Arc::clone(b))))
}

///
/// MemoryRead
///

pub struct MemoryRead {
    buckets: Arc<Buckets>,
}

impl ReadTx for MemoryRead {
    type Cursor<'a> = MemoryCursor;

    fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        check_bucket(bucket)?;
        Ok(self.buckets.contains_key(bucket))
    }

    fn get(&self, bucket: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        check_bucket(bucket)?;
        Ok(self.buckets.get(bucket).and_then(|b| b.get(key).cloned()))
    }

    fn cursor(&self, bucket: &str) -> Result<Option<Self::Cursor<'_>>, StoreError> {
        open_cursor(&self.buckets, bucket)
    }
}

///
/// MemoryWrite
///

pub struct MemoryWrite<'a> {
    store: &'a MemoryStore,
    _guard: MutexGuard<'a, ()>,
    buckets: Buckets,
}

impl ReadTx for MemoryWrite<'_> {
    type Cursor<'c>
        = MemoryCursor
    where
        Self: 'c;

    fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        check_bucket(bucket)?;
        Ok(self.buckets.contains_key(bucket))
    }

    fn get(&self, bucket: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        check_bucket(bucket)?;
        Ok(self.buckets.get(bucket).and_then(|b| b.get(key).cloned()))
    }

    fn cursor(&self, bucket: &str) -> Result<Option<Self::Cursor<'_>>, StoreError> {
        open_cursor(&self.buckets, bucket)
    }
}

impl WriteTx for MemoryWrite<'_> {
    fn put(&mut self, bucket: &str, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        check_bucket(bucket)?;
        if key.is_empty() {
            return Err(StoreError::EmptyKey {
                bucket: bucket.to_string(),
            });
        }

        let entry = self.buckets.entry(bucket.to_string()).or_default();
        Arc::make_mut(entry).insert(key.to_vec(), value);

        Ok(())
    }

    fn delete(&mut self, bucket: &str, key: &[u8]) -> Result<bool, StoreError> {
        check_bucket(bucket)?;

        let Some(entry) = self.buckets.get_mut(bucket) else {
            return Ok(false);
        };
        if !entry.contains_key(key) {
            return Ok(false);
        }

        Ok(Arc::make_mut(entry).remove(key).is_some())
    }

    fn delete_bucket(&mut self, bucket: &str) -> Result<bool, StoreError> {
        check_bucket(bucket)?;
        Ok(self.buckets.remove(bucket).is_some())
    }

    fn commit(self) -> Result<(), StoreError> {
        let Self { store, buckets, .. } = self;
        *store.committed.write() = Arc::new(buckets);

        Ok(())
    }
}

///
/// MemoryCursor
///

#[derive(Clone, Debug, Eq, PartialEq)]
enum Position {
    BeforeFirst,
    At(Vec<u8>),
    AfterLast,
}

pub struct MemoryCursor {
    bucket: Arc<Bucket>,
    position: Position,
}

impl MemoryCursor {
    const fn new(bucket: Arc<Bucket>) -> Self {
        Self {
            bucket,
            position: Position::BeforeFirst,
        }
    }

    fn land(&mut self, found: Option<(&Vec<u8>, &Vec<u8>)>, miss: Position) -> Option<Entry> {
        match found {
            Some((key, value)) => {
                self.position = Position::At(key.clone());
                Some((key.clone(), value.clone()))
            }
            None => {
                self.position = miss;
                None
            }
        }
    }
}

impl Cursor for MemoryCursor {
    fn first(&mut self) -> Option<Entry> {
        let bucket = Arc::clone(&self.bucket);
        self.land(bucket.first_key_value(), Position::AfterLast)
    }

    fn last(&mut self) -> Option<Entry> {
        let bucket = Arc::clone(&self.bucket);
        self.land(bucket.last_key_value(), Position::BeforeFirst)
    }

    fn seek(&mut self, key: &[u8]) -> Option<Entry> {
        let bucket = Arc::clone(&self.bucket);
        let found = bucket
            .range::<[u8], _>((Bound::Included(key), Bound::Unbounded))
            .next();

        self.land(found, Position::AfterLast)
    }

    fn next(&mut self) -> Option<Entry> {
        let bucket = Arc::clone(&self.bucket);
        let found = match &self.position {
            Position::BeforeFirst => bucket.first_key_value(),
            Position::At(key) => bucket
                .range::<[u8], _>((Bound::Excluded(key.as_slice()), Bound::Unbounded))
                .next(),
            Position::AfterLast => return None,
        };

        self.land(found, Position::AfterLast)
    }

    fn prev(&mut self) -> Option<Entry> {
        let bucket = Arc::clone(&self.bucket);
        let found = match &self.position {
            Position::AfterLast => bucket.last_key_value(),
            Position::At(key) => bucket
                .range::<[u8], _>((Bound::Unbounded, Bound::Excluded(key.as_slice())))
                .next_back(),
            Position::BeforeFirst => return None,
        };

        self.land(found, Position::BeforeFirst)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::db::store::{Cursor, ReadTx, Store, StoreError, WriteTx};

    fn seeded(keys: &[&[u8]]) -> MemoryStore {
        let store = MemoryStore::new();
        let mut tx = store.begin_write().unwrap();
        for key in keys {
            tx.put("b", key, key.to_vec()).unwrap();
        }
        tx.commit().unwrap();

        store
    }

    fn key(entry: Option<(Vec<u8>, Vec<u8>)>) -> Option<Vec<u8>> {
        entry.map(|(k, _)| k)
    }

    #[test]
    fn cursor_walks_in_key_order() {
        let store = seeded(&[b"c", b"a", b"b"]);
        let tx = store.begin_read().unwrap();
        let mut cursor = tx.cursor("b").unwrap().expect("bucket exists");

        assert_eq!(key(cursor.first()), Some(b"a".to_vec()));
        assert_eq!(key(cursor.next()), Some(b"b".to_vec()));
        assert_eq!(key(cursor.next()), Some(b"c".to_vec()));
        assert_eq!(key(cursor.next()), None);
        assert_eq!(key(cursor.prev()), Some(b"c".to_vec()));
        assert_eq!(key(cursor.prev()), Some(b"b".to_vec()));
    }

    #[test]
    fn seek_lands_on_first_key_at_or_after() {
        let store = seeded(&[b"a", b"c", b"e"]);
        let tx = store.begin_read().unwrap();
        let mut cursor = tx.cursor("b").unwrap().unwrap();

        assert_eq!(key(cursor.seek(b"c")), Some(b"c".to_vec()));
        assert_eq!(key(cursor.seek(b"d")), Some(b"e".to_vec()));
        assert_eq!(key(cursor.seek(b"f")), None);
        assert_eq!(key(cursor.prev()), Some(b"e".to_vec()));
    }

    #[test]
    fn missing_bucket_has_no_cursor() {
        let store = MemoryStore::new();
        let tx = store.begin_read().unwrap();

        assert!(tx.cursor("nope").unwrap().is_none());
        assert!(!tx.bucket_exists("nope").unwrap());
    }

    #[test]
    fn readers_see_the_snapshot_they_opened() {
        let store = seeded(&[b"a"]);
        let before = store.begin_read().unwrap();

        let mut tx = store.begin_write().unwrap();
        tx.put("b", b"z", vec![1]).unwrap();
        assert!(tx.get("b", b"z").unwrap().is_some());
        tx.commit().unwrap();

        assert!(before.get("b", b"z").unwrap().is_none());
        assert!(store.begin_read().unwrap().get("b", b"z").unwrap().is_some());
    }

    #[test]
    fn dropped_writer_rolls_back() {
        let store = seeded(&[b"a"]);
        {
            let mut tx = store.begin_write().unwrap();
            tx.delete("b", b"a").unwrap();
            tx.put("other", b"k", vec![]).unwrap();
        }

        let tx = store.begin_read().unwrap();
        assert!(tx.get("b", b"a").unwrap().is_some());
        assert!(!tx.bucket_exists("other").unwrap());
    }

    #[test]
    fn delete_reports_presence() {
        let store = seeded(&[b"a"]);
        let mut tx = store.begin_write().unwrap();

        assert!(tx.delete("b", b"a").unwrap());
        assert!(!tx.delete("b", b"a").unwrap());
        assert!(!tx.delete("missing", b"a").unwrap());
        assert!(tx.delete_bucket("b").unwrap());
        assert!(!tx.delete_bucket("b").unwrap());
    }

    #[test]
    fn empty_names_and_keys_are_rejected() {
        let store = MemoryStore::new();
        let mut tx = store.begin_write().unwrap();

        assert!(matches!(
            tx.put("", b"k", vec![]),
            Err(StoreError::EmptyBucketName)
        ));
        assert!(matches!(
            tx.put("b", b"", vec![]),
            Err(StoreError::EmptyKey { .. })
        ));
    }
}
