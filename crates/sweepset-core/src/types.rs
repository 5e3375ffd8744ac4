use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uuid::Uuid;

///
/// RecordId
///
/// Identifier of a record in the backing collection. ULID ordering doubles
/// as the stable sort key for every scan and resolution, so exclusion
/// application and pagination stay consistent across calls.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deref,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[repr(transparent)]
pub struct RecordId(Ulid);

impl RecordId {
    pub const MIN: Self = Self(Ulid::from_parts(0, 0));

    /// Generate an id with the current timestamp and random entropy.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// Deterministic id from a raw u128, for fixtures and tests.
    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(Ulid::from_parts((n >> 80) as u64, n & ((1u128 << 80) - 1)))
    }
}

///
/// TokenId
///
/// Opaque selection-token key. Random v4 so tokens are unguessable;
/// never sequential.
///

#[derive(
    Clone, Copy, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[repr(transparent)]
pub struct TokenId(Uuid);

impl TokenId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

///
/// JobId
///
/// Key for an asynchronous bulk execution in the job registry.
///

#[derive(
    Clone, Copy, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[repr(transparent)]
pub struct JobId(Uuid);

impl JobId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ids_order_by_ulid() {
        let a = RecordId::from_u128(1);
        let b = RecordId::from_u128(2);

        assert!(a < b);
        assert_eq!(RecordId::MIN, RecordId::from_u128(0));
    }

    #[test]
    fn token_ids_are_distinct() {
        assert_ne!(TokenId::generate(), TokenId::generate());
    }
}
