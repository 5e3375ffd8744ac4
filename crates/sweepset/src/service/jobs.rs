use crate::error::{Error, ErrorOrigin};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use sweepset_core::{executor::BulkOutcome, types::JobId};

///
/// JobStatus
///
/// Polling surface for an asynchronous bulk execution: `Running` until the
/// spawned task finalizes its outcome.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Finished { outcome: BulkOutcome },
}

///
/// JobRegistry
///
/// In-process registry of bulk executions. Entries are written twice per
/// job (running, then finished) and read by pollers; finished entries stay
/// until the registry is dropped with its service.
///

#[derive(Clone, Default)]
pub(crate) struct JobRegistry {
    jobs: Arc<Mutex<HashMap<JobId, JobStatus>>>,
}

impl JobRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn start(&self, job: JobId) -> Result<(), Error> {
        self.lock()?.insert(job, JobStatus::Running);

        Ok(())
    }

    pub(crate) fn finish(&self, job: JobId, outcome: BulkOutcome) -> Result<(), Error> {
        self.lock()?.insert(job, JobStatus::Finished { outcome });

        Ok(())
    }

    pub(crate) fn status(&self, job: JobId) -> Result<Option<JobStatus>, Error> {
        Ok(self.lock()?.get(&job).cloned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<JobId, JobStatus>>, Error> {
        self.jobs
            .lock()
            .map_err(|_| Error::internal(ErrorOrigin::Service, "job registry lock poisoned"))
    }
}
