pub(crate) mod memory;

use crate::{
    filter::FilterDescriptor,
    snapshot::{SnapshotBasis, SnapshotVersion},
    types::RecordId,
};
use thiserror::Error as ThisError;

// re-exports
pub use memory::{MemoryRecordStore, Record};

///
/// StoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    /// Transient backend failure. Callers may retry with backoff.
    #[error("record store unavailable: {message}")]
    Unavailable { message: String },

    /// The pinned version is no longer retained by the store. The caller
    /// must re-create the selection; resolution never silently degrades
    /// to live data.
    #[error("snapshot version {version} is no longer available")]
    SnapshotUnavailable { version: SnapshotVersion },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

///
/// ScanCursor
///
/// Resume point for an ordered scan: continue strictly after this id.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanCursor {
    pub after: RecordId,
}

///
/// ScanPage
///
/// One ordered page of matching ids. `next` is present while the scan may
/// have more to yield.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanPage {
    pub ids: Vec<RecordId>,
    pub next: Option<ScanCursor>,
}

///
/// RecordStore
///
/// The seam to the backing record collection. Implementations must emit
/// scan pages in RecordId order, stable across calls for a pinned basis, so
/// exclusion application and continuation stay consistent.
///
/// All reads are pure with respect to the chosen basis; nothing here
/// mutates the collection.
///

pub trait RecordStore: Send + Sync {
    /// Current version of the live collection.
    fn snapshot_version(&self) -> Result<SnapshotVersion, StoreError>;

    /// One ordered page of ids matching `filter` under `basis`, resuming
    /// after `cursor`, at most `batch_limit` ids.
    fn scan(
        &self,
        filter: &FilterDescriptor,
        basis: SnapshotBasis,
        cursor: Option<ScanCursor>,
        batch_limit: usize,
    ) -> Result<ScanPage, StoreError>;

    /// Whether one record currently matches `filter` under `basis`.
    /// Absent records do not match.
    fn matches(
        &self,
        filter: &FilterDescriptor,
        basis: SnapshotBasis,
        id: RecordId,
    ) -> Result<bool, StoreError>;

    /// Whether the record exists in the live collection, regardless of any
    /// pinned basis. A deleted record is gone from the queryable set even
    /// when an older snapshot still holds it; the resolver uses this to
    /// keep pinned streams from yielding ids no action could reach.
    fn exists(&self, id: RecordId) -> Result<bool, StoreError>;

    /// Total count of records matching `filter` under `basis`.
    fn count_matching(
        &self,
        filter: &FilterDescriptor,
        basis: SnapshotBasis,
    ) -> Result<u64, StoreError>;
}
