use crate::{
    filter::{FieldLookup, FieldPresence, FilterDescriptor},
    snapshot::{SnapshotBasis, SnapshotVersion},
    store::{RecordStore, ScanCursor, ScanPage, StoreError},
    types::RecordId,
    value::Value,
};
use std::{
    collections::BTreeMap,
    ops::Bound,
    sync::{Arc, RwLock},
};

/// Pinned versions retained by default before the oldest is evicted.
const DEFAULT_SNAPSHOT_RETENTION: usize = 64;

///
/// Record
///
/// Row representation for the in-memory backend: an id plus named scalar
/// fields.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: BTreeMap<String, Value>,
}

impl Record {
    #[must_use]
    pub const fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }
}

impl FieldLookup for Record {
    fn field(&self, name: &str) -> FieldPresence {
        match self.fields.get(name) {
            Some(value) => FieldPresence::Present(value.clone()),
            None => FieldPresence::Missing,
        }
    }
}

///
/// MemoryRecordStore
///
/// Versioned in-memory record store: the reference backend for tests and
/// embedded use. Every mutation bumps the version and snapshots the prior
/// state; a bounded history of versions stays resolvable for pinned reads.
///

pub struct MemoryRecordStore {
    inner: RwLock<Inner>,
}

struct Inner {
    version: SnapshotVersion,
    live: Arc<BTreeMap<RecordId, Record>>,
    history: BTreeMap<SnapshotVersion, Arc<BTreeMap<RecordId, Record>>>,
    retention: usize,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_snapshot_retention(DEFAULT_SNAPSHOT_RETENTION)
    }

    /// A store retaining at most `retention` pinned versions.
    #[must_use]
    pub fn with_snapshot_retention(retention: usize) -> Self {
        let live: Arc<BTreeMap<RecordId, Record>> = Arc::new(BTreeMap::new());
        let mut history = BTreeMap::new();
        history.insert(SnapshotVersion::INITIAL, Arc::clone(&live));

        Self {
            inner: RwLock::new(Inner {
                version: SnapshotVersion::INITIAL,
                live,
                history,
                retention: retention.max(1),
            }),
        }
    }

    /// Insert or replace one record. Returns the new version.
    pub fn insert(&self, record: Record) -> Result<SnapshotVersion, StoreError> {
        self.mutate(|rows| {
            rows.insert(record.id(), record);
        })
    }

    /// Insert or replace a batch of records under one version bump.
    pub fn insert_many(
        &self,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<SnapshotVersion, StoreError> {
        self.mutate(|rows| {
            for record in records {
                rows.insert(record.id(), record);
            }
        })
    }

    /// Remove one record. Returns the new version.
    pub fn remove(&self, id: RecordId) -> Result<SnapshotVersion, StoreError> {
        self.mutate(|rows| {
            rows.remove(&id);
        })
    }

    /// Live record count, unfiltered.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.live.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.live.is_empty())
    }

    fn mutate(
        &self,
        apply: impl FnOnce(&mut BTreeMap<RecordId, Record>),
    ) -> Result<SnapshotVersion, StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::unavailable("record store lock poisoned"))?;
        let inner = &mut *guard;

        let mut rows = (*inner.live).clone();
        apply(&mut rows);

        inner.version = inner.version.next();
        inner.live = Arc::new(rows);

        let version = inner.version;
        inner.history.insert(version, Arc::clone(&inner.live));
        while inner.history.len() > inner.retention {
            inner.history.pop_first();
        }

        Ok(version)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::unavailable("record store lock poisoned"))
    }

    fn rows_for(
        &self,
        basis: SnapshotBasis,
    ) -> Result<Arc<BTreeMap<RecordId, Record>>, StoreError> {
        let inner = self.read()?;

        match basis {
            SnapshotBasis::Live => Ok(Arc::clone(&inner.live)),
            SnapshotBasis::Pinned { version } => inner
                .history
                .get(&version)
                .map(Arc::clone)
                .ok_or(StoreError::SnapshotUnavailable { version }),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn snapshot_version(&self) -> Result<SnapshotVersion, StoreError> {
        Ok(self.read()?.version)
    }

    fn scan(
        &self,
        filter: &FilterDescriptor,
        basis: SnapshotBasis,
        cursor: Option<ScanCursor>,
        batch_limit: usize,
    ) -> Result<ScanPage, StoreError> {
        let rows = self.rows_for(basis)?;

        let lower = match cursor {
            Some(ScanCursor { after }) => Bound::Excluded(after),
            None => Bound::Unbounded,
        };

        let mut ids = Vec::with_capacity(batch_limit.min(rows.len()));
        for (id, record) in rows.range((lower, Bound::Unbounded)) {
            if ids.len() == batch_limit {
                // Page full with rows still unscanned; hand back a resume point.
                return Ok(ScanPage {
                    next: ids.last().map(|last| ScanCursor { after: *last }),
                    ids,
                });
            }

            if filter.matches(record) {
                ids.push(*id);
            }
        }

        Ok(ScanPage { ids, next: None })
    }

    fn matches(
        &self,
        filter: &FilterDescriptor,
        basis: SnapshotBasis,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        let rows = self.rows_for(basis)?;

        Ok(rows.get(&id).is_some_and(|record| filter.matches(record)))
    }

    fn exists(&self, id: RecordId) -> Result<bool, StoreError> {
        Ok(self.read()?.live.contains_key(&id))
    }

    fn count_matching(
        &self,
        filter: &FilterDescriptor,
        basis: SnapshotBasis,
    ) -> Result<u64, StoreError> {
        let rows = self.rows_for(basis)?;

        Ok(rows.values().filter(|record| filter.matches(*record)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> RecordId {
        RecordId::from_u128(n)
    }

    fn seed(store: &MemoryRecordStore, n: u128) {
        let records = (0..n).map(|i| {
            Record::new(id(i)).field("status", if i % 2 == 0 { "open" } else { "closed" })
        });
        store.insert_many(records).expect("seed should succeed");
    }

    #[test]
    fn scan_pages_in_id_order() {
        let store = MemoryRecordStore::new();
        seed(&store, 10);

        let filter = FilterDescriptor::match_all().eq("status", "open");
        let page = store
            .scan(&filter, SnapshotBasis::Live, None, 3)
            .expect("scan should succeed");

        // Even ids match; the limit caps matches per page and the resume
        // point continues strictly after the last emitted id.
        assert_eq!(page.ids, vec![id(0), id(2), id(4)]);
        let next = page.next.expect("a resume point");

        let page = store
            .scan(&filter, SnapshotBasis::Live, Some(next), 3)
            .expect("scan should succeed");
        assert_eq!(page.ids, vec![id(6), id(8)]);
        assert!(page.next.is_none());
    }

    #[test]
    fn pinned_scan_ignores_later_mutations() {
        let store = MemoryRecordStore::new();
        seed(&store, 4);

        let pinned = SnapshotBasis::Pinned {
            version: store.snapshot_version().expect("version"),
        };
        store.remove(id(0)).expect("remove should succeed");

        let filter = FilterDescriptor::match_all();
        let live = store
            .scan(&filter, SnapshotBasis::Live, None, 100)
            .expect("scan should succeed");
        let at_pin = store
            .scan(&filter, pinned, None, 100)
            .expect("scan should succeed");

        assert_eq!(live.ids.len(), 3);
        assert_eq!(at_pin.ids.len(), 4);
    }

    #[test]
    fn evicted_snapshot_fails_explicitly() {
        let store = MemoryRecordStore::with_snapshot_retention(2);
        seed(&store, 1);

        let version = store.snapshot_version().expect("version");
        // Two further mutations push the pinned version out of history.
        store.insert(Record::new(id(10))).expect("insert");
        store.insert(Record::new(id(11))).expect("insert");

        let err = store
            .scan(
                &FilterDescriptor::match_all(),
                SnapshotBasis::Pinned { version },
                None,
                10,
            )
            .unwrap_err();

        assert_eq!(err, StoreError::SnapshotUnavailable { version });
    }

    #[test]
    fn matches_is_false_for_absent_records() {
        let store = MemoryRecordStore::new();
        seed(&store, 2);

        let filter = FilterDescriptor::match_all();
        assert!(store.matches(&filter, SnapshotBasis::Live, id(0)).expect("matches"));
        assert!(!store.matches(&filter, SnapshotBasis::Live, id(99)).expect("matches"));
    }

    #[test]
    fn count_matching_counts_filter_hits() {
        let store = MemoryRecordStore::new();
        seed(&store, 10);

        let filter = FilterDescriptor::match_all().eq("status", "open");
        assert_eq!(
            store.count_matching(&filter, SnapshotBasis::Live).expect("count"),
            5
        );
    }
}
