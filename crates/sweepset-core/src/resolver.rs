use crate::{
    filter::FilterDescriptor,
    selection::SelectionState,
    snapshot::SnapshotBasis,
    store::{RecordStore, ScanCursor, StoreError},
    types::RecordId,
};
use std::collections::{BTreeSet, VecDeque};
use thiserror::Error as ThisError;

///
/// ResolveError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResolveError {
    /// The stream could not be opened at all (nothing was emitted).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The backing store failed mid-stream. Everything emitted so far
    /// stands; the consumer must treat processed records as final rather
    /// than silently retrying the whole resolution.
    #[error("resolution interrupted after {emitted} ids: {source}")]
    Interrupted { emitted: u64, source: StoreError },
}

///
/// Resolver
///
/// Turns a (filter, selection, basis) triple into a finite, ordered,
/// pull-based stream of record ids. Batches bound memory: the full
/// candidate set is never materialized for an all-mode selection.
///

#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a, S: ?Sized> {
    store: &'a S,
    batch_size: usize,
}

impl<'a, S: RecordStore + ?Sized> Resolver<'a, S> {
    #[must_use]
    pub fn new(store: &'a S, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Open a stream over the selection.
    ///
    /// Manual mode validates the included ids directly against the filter
    /// (the include-set is a page's worth of rows, not a scan); all mode
    /// streams store pages and drops excluded ids. Emission order is
    /// RecordId order in both cases.
    ///
    /// The stream is lazy and not restartable: under a live basis a second
    /// resolve may legitimately yield a different set.
    ///
    /// Under a pinned basis, matching is evaluated against the pinned
    /// version, but records deleted from the live collection since the pin
    /// are dropped: deletion removes them from the queryable set, so the
    /// stream yields fewer ids than the pin's nominal count. Documented
    /// behavior, not a miscount.
    #[must_use]
    pub fn resolve(
        &self,
        filter: &FilterDescriptor,
        selection: &SelectionState,
        basis: SnapshotBasis,
    ) -> IdStream<'a, S> {
        let state = match selection {
            SelectionState::Manual { included } => StreamState::Manual {
                pending: included.iter().copied().collect(),
            },
            SelectionState::All { excluded } => StreamState::All {
                excluded: excluded.clone(),
                cursor: None,
            },
        };

        IdStream {
            store: self.store,
            filter: filter.clone(),
            basis,
            batch_size: self.batch_size,
            emitted: 0,
            state,
        }
    }
}

///
/// IdStream
///
/// Pull-based cursor over the resolved ids. `next_batch` yields non-empty
/// batches until the stream is exhausted, then `None`. Fused: after
/// exhaustion or an error, every further pull yields `None`.
///

pub struct IdStream<'a, S: ?Sized> {
    store: &'a S,
    filter: FilterDescriptor,
    basis: SnapshotBasis,
    batch_size: usize,
    emitted: u64,
    state: StreamState,
}

enum StreamState {
    Manual { pending: VecDeque<RecordId> },
    All {
        excluded: BTreeSet<RecordId>,
        cursor: Option<ScanCursor>,
    },
    Done,
}

impl<S: RecordStore + ?Sized> IdStream<'_, S> {
    /// Ids emitted so far, across all batches.
    #[must_use]
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Pull the next batch of resolved ids.
    pub fn next_batch(&mut self) -> Result<Option<Vec<RecordId>>, ResolveError> {
        let result = match &self.state {
            StreamState::Done => return Ok(None),
            StreamState::Manual { .. } => self.next_manual_batch(),
            StreamState::All { .. } => self.next_all_batch(),
        };

        match result {
            Ok(Some(batch)) => {
                self.emitted += batch.len() as u64;
                Ok(Some(batch))
            }
            Ok(None) => {
                self.state = StreamState::Done;
                Ok(None)
            }
            Err(source) => {
                self.state = StreamState::Done;
                if self.emitted == 0 {
                    Err(ResolveError::Store(source))
                } else {
                    Err(ResolveError::Interrupted {
                        emitted: self.emitted,
                        source,
                    })
                }
            }
        }
    }

    fn next_manual_batch(&mut self) -> Result<Option<Vec<RecordId>>, StoreError> {
        let pinned = self.basis.is_pinned();
        let StreamState::Manual { pending } = &mut self.state else {
            return Ok(None);
        };

        while !pending.is_empty() {
            let mut batch = Vec::new();
            for _ in 0..self.batch_size {
                let Some(id) = pending.pop_front() else {
                    break;
                };

                if !self.store.matches(&self.filter, self.basis, id)? {
                    continue;
                }

                // A pinned match can be a since-deleted record; no action
                // could reach it, so it never leaves the stream.
                if pinned && !self.store.exists(id)? {
                    continue;
                }

                batch.push(id);
            }

            if !batch.is_empty() {
                return Ok(Some(batch));
            }
        }

        Ok(None)
    }

    fn next_all_batch(&mut self) -> Result<Option<Vec<RecordId>>, StoreError> {
        let pinned = self.basis.is_pinned();
        let StreamState::All { excluded, cursor } = &mut self.state else {
            return Ok(None);
        };

        loop {
            let page = self
                .store
                .scan(&self.filter, self.basis, *cursor, self.batch_size)?;

            let mut batch = Vec::with_capacity(page.ids.len());
            for id in page.ids {
                if excluded.contains(&id) {
                    continue;
                }

                // A pinned page can hold since-deleted records; drop them,
                // they are gone from the live queryable set.
                if pinned && !self.store.exists(id)? {
                    continue;
                }

                batch.push(id);
            }

            match page.next {
                Some(next) => {
                    *cursor = Some(next);
                    if !batch.is_empty() {
                        return Ok(Some(batch));
                    }
                    // Every id on this page was excluded; keep pulling.
                }
                None => {
                    return Ok(if batch.is_empty() { None } else { Some(batch) });
                }
            }
        }
    }
}
