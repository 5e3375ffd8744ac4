use crate::types::RecordId;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ActionError
///
/// Failure of the caller-supplied action for one record. The kind is the
/// caller's own taxonomy; the executor only accumulates it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{kind}: {message}")]
pub struct ActionError {
    pub kind: String,
    pub message: String,
}

impl ActionError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

///
/// FailedRecord
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FailedRecord {
    pub id: RecordId,
    pub error: ActionError,
}

///
/// AbortReason
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    /// Cooperative cancellation between batches.
    Cancelled,

    /// The caller's soft timeout elapsed; treated as a cancellation, not a
    /// hard error.
    TimedOut,

    /// The resolver failed mid-stream. Records processed before the
    /// failure are final.
    ResolutionInterrupted { message: String },
}

///
/// BulkStatus
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BulkStatus {
    Completed,
    CompletedWithErrors,
    Aborted { reason: AbortReason },
}

///
/// BulkOutcome
///
/// Aggregate result of one bulk execution. Always reports counts plus a
/// bounded list of failed records with reasons, never just a boolean.
///
/// `attempted` counts actions actually invoked, and is the authoritative
/// figure for "how many records this operation touched"; any estimate shown
/// beforehand is advisory. `attempted` may be below the nominal selection
/// size when records were concurrently deleted; that is expected, not an
/// error.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BulkOutcome {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: Vec<FailedRecord>,
    /// Failures beyond the report cap, counted but not listed.
    pub failed_unlisted: u64,
    pub status: BulkStatus,
}

impl BulkOutcome {
    #[must_use]
    pub fn failed_total(&self) -> u64 {
        self.failed.len() as u64 + self.failed_unlisted
    }

    /// `succeeded + failed = attempted`, always.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.succeeded + self.failed_total() == self.attempted
    }

    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self.status, BulkStatus::Aborted { .. })
    }
}
