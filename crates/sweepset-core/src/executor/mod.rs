pub(crate) mod outcome;


use crate::{resolver::IdStream, store::RecordStore, types::RecordId};
use std::collections::HashSet;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// re-exports
pub use outcome::{AbortReason, ActionError, BulkOutcome, BulkStatus, FailedRecord};

///
/// ExecuteOptions
///
/// Per-execution knobs. Concurrency bounds load on whatever downstream
/// system the action touches; order-sensitive actions must set it to 1,
/// since completion order across records is otherwise unspecified.
///

#[derive(Clone, Debug)]
pub struct ExecuteOptions {
    pub concurrency: usize,
    pub timeout: Option<std::time::Duration>,
    pub cancel: CancellationToken,
    /// Max failed records listed in the outcome; the rest are counted.
    pub failed_report_cap: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout: None,
            cancel: CancellationToken::new(),
            failed_report_cap: 1_000,
        }
    }
}

///
/// BulkExecutor
///
/// Consumes a resolved ID stream and applies a caller-supplied action per
/// record, accumulating partial results. One record's failure never aborts
/// the rest: skip-and-report, not all-or-nothing.
///
/// Cancellation is cooperative and checked between batches; in-flight
/// actions are drained, never torn down, and nothing already applied is
/// rolled back.
///

#[derive(Clone, Debug, Default)]
pub struct BulkExecutor {
    options: ExecuteOptions,
}

impl BulkExecutor {
    #[must_use]
    pub const fn new(options: ExecuteOptions) -> Self {
        Self { options }
    }

    pub async fn execute<S, A, F>(&self, mut stream: IdStream<'_, S>, action: A) -> BulkOutcome
    where
        S: RecordStore + ?Sized,
        A: Fn(RecordId) -> F + Send,
        F: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        let concurrency = self.options.concurrency.max(1);
        let deadline = self
            .options
            .timeout
            .map(|timeout| tokio::time::Instant::now() + timeout);

        let mut acc = Accumulator::new(self.options.failed_report_cap);
        let mut joins: JoinSet<(RecordId, Result<(), ActionError>)> = JoinSet::new();
        // A re-resolved live stream may re-emit an id the execution already
        // touched; each id is processed at most once per execution.
        let mut seen: HashSet<RecordId> = HashSet::new();
        let mut abort: Option<AbortReason> = None;

        loop {
            if self.options.cancel.is_cancelled() {
                abort = Some(AbortReason::Cancelled);
                break;
            }

            if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
                abort = Some(AbortReason::TimedOut);
                break;
            }

            let batch = match stream.next_batch() {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(err) => {
                    abort = Some(AbortReason::ResolutionInterrupted {
                        message: err.to_string(),
                    });
                    break;
                }
            };

            debug!(batch = batch.len(), in_flight = joins.len(), "bulk batch pulled");

            for id in batch {
                if !seen.insert(id) {
                    continue;
                }

                while joins.len() >= concurrency {
                    if let Some(joined) = joins.join_next().await {
                        acc.record(joined);
                    }
                }

                acc.attempted += 1;
                let fut = action(id);
                joins.spawn(async move { (id, fut.await) });
            }
        }

        // Drain in-flight actions; their results count even on abort.
        while let Some(joined) = joins.join_next().await {
            acc.record(joined);
        }

        let outcome = acc.finalize(abort);
        info!(
            attempted = outcome.attempted,
            succeeded = outcome.succeeded,
            failed = outcome.failed_total(),
            aborted = outcome.is_aborted(),
            "bulk execution finished"
        );

        outcome
    }
}

///
/// Accumulator
///

struct Accumulator {
    attempted: u64,
    succeeded: u64,
    failed: Vec<FailedRecord>,
    failed_unlisted: u64,
    report_cap: usize,
}

impl Accumulator {
    const fn new(report_cap: usize) -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            failed: Vec::new(),
            failed_unlisted: 0,
            report_cap,
        }
    }

    fn record(
        &mut self,
        joined: Result<(RecordId, Result<(), ActionError>), tokio::task::JoinError>,
    ) {
        match joined {
            Ok((_, Ok(()))) => self.succeeded += 1,
            Ok((id, Err(error))) => {
                if self.failed.len() < self.report_cap {
                    self.failed.push(FailedRecord { id, error });
                } else {
                    self.failed_unlisted += 1;
                }
            }
            Err(join_err) => {
                // The action panicked or was torn down; the id is gone with
                // the task, so it counts as an unlisted failure.
                warn!(%join_err, "bulk action task failed to join");
                self.failed_unlisted += 1;
            }
        }
    }

    fn finalize(self, abort: Option<AbortReason>) -> BulkOutcome {
        let status = match abort {
            Some(reason) => BulkStatus::Aborted { reason },
            None if self.failed.is_empty() && self.failed_unlisted == 0 => BulkStatus::Completed,
            None => BulkStatus::CompletedWithErrors,
        };

        BulkOutcome {
            attempted: self.attempted,
            succeeded: self.succeeded,
            failed: self.failed,
            failed_unlisted: self.failed_unlisted,
            status,
        }
    }
}
