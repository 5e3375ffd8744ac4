pub(crate) mod store;

use crate::{
    filter::FilterDescriptor, selection::SelectionState, snapshot::SnapshotBasis, types::TokenId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use time::OffsetDateTime;

// re-exports
pub use store::{Clock, MemoryTokenStore, SystemClock, TokenStore};

///
/// TokenError
///
/// `NotFound` and `Expired` are deliberately distinct: the former points at
/// a caller bug (unknown or already-consumed handle), the latter means
/// "re-select and retry". Once an expired entry has been swept, later
/// resolves of the same id report `NotFound`; the distinction is
/// best-effort after TTL cleanup, as with any external keyed store.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TokenError {
    #[error("selection token not found")]
    NotFound,

    #[error("selection token expired")]
    Expired,

    /// Transient store failure. Callers may retry with backoff.
    #[error("token store unavailable: {message}")]
    Unavailable { message: String },
}

impl TokenError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

///
/// SelectionToken
///
/// The opaque handle returned to clients: random id plus its expiry stamp.
/// Large selections never need enumerating client-side; the token stands in
/// for the whole (filter, selection, basis) tuple.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SelectionToken {
    pub id: TokenId,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

///
/// TokenRecord
///
/// The server-side tuple a token resolves to. Immutable once created: no
/// update-in-place ever happens, so concurrent resolves of one token are
/// plain reads with nothing to race on.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TokenRecord {
    pub filter: FilterDescriptor,
    pub selection: SelectionState,
    pub basis: SnapshotBasis,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub single_use: bool,
}

impl TokenRecord {
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}
