use crate::{
    filter::FilterDescriptor,
    selection::SelectionState,
    snapshot::SnapshotBasis,
    token::{SelectionToken, TokenError, TokenRecord},
    types::TokenId,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use time::{Duration, OffsetDateTime};
use tracing::debug;

///
/// Clock
///
/// Time source seam so token expiry is testable without waiting out a TTL.
///

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

///
/// SystemClock
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

///
/// TokenStore
///
/// Keyed store mapping an opaque token id to its bound
/// (filter, selection, basis) tuple. Entries are append/delete-only per
/// key; TTL expiry is the operational safety valve that bounds storage
/// growth, replacing any manual cleanup.
///

pub trait TokenStore: Send + Sync {
    /// Persist a fresh tuple under a new random token. Expiry is
    /// now + TTL.
    fn create(
        &self,
        filter: FilterDescriptor,
        selection: SelectionState,
        basis: SnapshotBasis,
    ) -> Result<SelectionToken, TokenError>;

    /// Look up a token's bound tuple. Pure read; never consumes.
    fn resolve(&self, id: TokenId) -> Result<TokenRecord, TokenError>;

    /// Delete a token early (e.g. after a single-use consumption).
    /// Idempotent: deleting an unknown token succeeds.
    fn invalidate(&self, id: TokenId) -> Result<(), TokenError>;
}

///
/// MemoryTokenStore
///
/// In-process reference implementation. Expired entries are swept
/// opportunistically on create, so an idle store's footprint stays bounded
/// by its live tokens.
///

pub struct MemoryTokenStore {
    entries: Mutex<HashMap<TokenId, TokenRecord>>,
    ttl: Duration,
    single_use: bool,
    clock: Arc<dyn Clock>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            single_use: false,
            clock: Arc::new(SystemClock),
        }
    }

    /// Mark minted tokens single-use. Consumption stays an explicit
    /// `invalidate` by the caller after a successful execution.
    #[must_use]
    pub fn single_use(mut self, single_use: bool) -> Self {
        self.single_use = single_use;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Count of live (unexpired) tokens.
    pub fn live_tokens(&self) -> Result<usize, TokenError> {
        let now = self.clock.now();
        let entries = self.lock()?;

        Ok(entries.values().filter(|r| !r.is_expired(now)).count())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<TokenId, TokenRecord>>, TokenError> {
        self.entries
            .lock()
            .map_err(|_| TokenError::unavailable("token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn create(
        &self,
        filter: FilterDescriptor,
        selection: SelectionState,
        basis: SnapshotBasis,
    ) -> Result<SelectionToken, TokenError> {
        let now = self.clock.now();
        let record = TokenRecord {
            filter,
            selection,
            basis,
            created_at: now,
            expires_at: now + self.ttl,
            single_use: self.single_use,
        };

        let id = TokenId::generate();
        let expires_at = record.expires_at;

        let mut entries = self.lock()?;
        entries.retain(|_, r| !r.is_expired(now));
        entries.insert(id, record);

        debug!(%id, %expires_at, live = entries.len(), "selection token created");

        Ok(SelectionToken { id, expires_at })
    }

    fn resolve(&self, id: TokenId) -> Result<TokenRecord, TokenError> {
        let now = self.clock.now();
        let mut entries = self.lock()?;

        match entries.get(&id) {
            None => Err(TokenError::NotFound),
            Some(record) if record.is_expired(now) => {
                entries.remove(&id);
                Err(TokenError::Expired)
            }
            Some(record) => Ok(record.clone()),
        }
    }

    fn invalidate(&self, id: TokenId) -> Result<(), TokenError> {
        let mut entries = self.lock()?;

        if entries.remove(&id).is_some() {
            debug!(%id, "selection token invalidated");
        }

        Ok(())
    }
}
