use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// SnapshotVersion
///
/// Monotonic version stamped by the record store on every mutation.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[repr(transparent)]
pub struct SnapshotVersion(u64);

impl SnapshotVersion {
    pub const INITIAL: Self = Self(0);

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

///
/// SnapshotBasis
///
/// Whether resolution re-evaluates the filter against live data or against
/// one pinned store version.
///
/// A pinned basis makes resolution deterministic across calls. A live basis
/// may resolve differently between calls as underlying data changes; that is
/// a documented non-guarantee, not a bug.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum SnapshotBasis {
    Live,
    Pinned { version: SnapshotVersion },
}

impl SnapshotBasis {
    #[must_use]
    pub const fn is_pinned(self) -> bool {
        matches!(self, Self::Pinned { .. })
    }
}
