pub(crate) mod jobs;

use crate::{
    config::ServiceConfig,
    error::{Error, ErrorKind, ErrorOrigin, JobErrorKind},
};
use std::sync::Arc;
use sweepset_core::{
    executor::{ActionError, BulkExecutor, BulkOutcome, ExecuteOptions},
    filter::FilterDescriptor,
    resolver::Resolver,
    schema::CollectionSchema,
    selection::SelectionState,
    snapshot::SnapshotBasis,
    store::RecordStore,
    token::{MemoryTokenStore, SelectionToken, TokenRecord, TokenStore},
    types::{JobId, RecordId, TokenId},
};
use tracing::{debug, info, instrument};

// re-exports
pub use jobs::JobStatus;

///
/// SelectionService
///
/// Session facade over the core engine: mints selection tokens, serves
/// advisory estimates, and drives bulk executions. Wraps core errors into
/// the public [`Error`] taxonomy at this boundary.
///
/// Tokens are minted lazily, only when a bulk action is actually on the
/// table; row toggling stays a client-side affair against
/// [`SelectionState`], which keeps "select all" O(1) instead of a
/// fetch-everything on every click.
///

pub struct SelectionService<S> {
    store: Arc<S>,
    schema: CollectionSchema,
    tokens: Arc<dyn TokenStore>,
    jobs: jobs::JobRegistry,
    config: ServiceConfig,
}

impl<S: RecordStore + 'static> SelectionService<S> {
    /// Create a service over `store`, minting tokens from an in-process
    /// TTL store configured per `config`.
    #[must_use]
    pub fn new(store: Arc<S>, schema: CollectionSchema, config: ServiceConfig) -> Self {
        let tokens = MemoryTokenStore::new(config.token_ttl).single_use(config.single_use_tokens);

        Self {
            store,
            schema,
            tokens: Arc::new(tokens),
            jobs: jobs::JobRegistry::new(),
            config,
        }
    }

    /// Swap the token store (e.g. for a shared external keyed store, or a
    /// test clock).
    #[must_use]
    pub fn with_token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = tokens;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Selection lifecycle
    // ------------------------------------------------------------------

    /// Validate the filter and mint a token binding
    /// (filter, selection, basis).
    ///
    /// `pin` stamps the store's current snapshot version, making later
    /// resolution deterministic; an unpinned token re-evaluates against
    /// live data at execution time.
    #[instrument(skip_all)]
    pub fn create_selection(
        &self,
        filter: FilterDescriptor,
        selection: SelectionState,
        pin: bool,
    ) -> Result<SelectionToken, Error> {
        filter.validate(&self.schema)?;

        let basis = if pin {
            SnapshotBasis::Pinned {
                version: self.store.snapshot_version()?,
            }
        } else {
            SnapshotBasis::Live
        };

        let token = self.tokens.create(filter, selection, basis)?;
        debug!(token = %token.id, basis = ?basis, collection = self.schema.name(), "selection token minted");

        Ok(token)
    }

    /// Advisory selected-record count for a token.
    ///
    /// The total is re-queried from the store, so the figure can drift from
    /// what any earlier display showed, and the data may move again before
    /// execution. The final outcome's `attempted` count is authoritative.
    #[instrument(skip(self))]
    pub fn estimate(&self, token: TokenId) -> Result<u64, Error> {
        let record = self.tokens.resolve(token)?;
        let total = self.store.count_matching(&record.filter, record.basis)?;

        Ok(record.selection.estimated_count(total))
    }

    /// Drop a token early. Idempotent.
    pub fn invalidate_selection(&self, token: TokenId) -> Result<(), Error> {
        Ok(self.tokens.invalidate(token)?)
    }

    // ------------------------------------------------------------------
    // Bulk execution
    // ------------------------------------------------------------------

    /// Resolve a token and run `action` over every selected record,
    /// synchronously to completion, with the service's default options.
    /// For small selections; large ones should go through
    /// [`Self::start_bulk_action`].
    pub async fn run_bulk_action<A, F>(&self, token: TokenId, action: A) -> Result<BulkOutcome, Error>
    where
        A: Fn(RecordId) -> F + Send,
        F: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.run_bulk_action_with(token, action, self.execute_options())
            .await
    }

    /// [`Self::run_bulk_action`] with caller-supplied options (soft
    /// timeout, cancellation token, concurrency).
    #[instrument(skip(self, action, options))]
    pub async fn run_bulk_action_with<A, F>(
        &self,
        token: TokenId,
        action: A,
        options: ExecuteOptions,
    ) -> Result<BulkOutcome, Error>
    where
        A: Fn(RecordId) -> F + Send,
        F: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        let record = self.tokens.resolve(token)?;
        let outcome = execute_selection(
            self.store.as_ref(),
            &record,
            action,
            options,
            self.config.effective_batch_size(),
        )
        .await;

        self.consume_if_single_use(token, &record, &outcome)?;

        Ok(outcome)
    }

    /// Resolve a token and run `action` as a background job with the
    /// service's default options. Returns the job id immediately; poll
    /// with [`Self::job_status`].
    pub fn start_bulk_action<A, F>(&self, token: TokenId, action: A) -> Result<JobId, Error>
    where
        A: Fn(RecordId) -> F + Send + Sync + 'static,
        F: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.start_bulk_action_with(token, action, self.execute_options())
    }

    /// [`Self::start_bulk_action`] with caller-supplied options.
    ///
    /// Token and filter problems fail here, at submission; per-record
    /// action failures land in the job's outcome.
    #[instrument(skip(self, action, options))]
    pub fn start_bulk_action_with<A, F>(
        &self,
        token: TokenId,
        action: A,
        options: ExecuteOptions,
    ) -> Result<JobId, Error>
    where
        A: Fn(RecordId) -> F + Send + Sync + 'static,
        F: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        let record = self.tokens.resolve(token)?;

        let job = JobId::generate();
        self.jobs.start(job)?;

        let store = Arc::clone(&self.store);
        let tokens = Arc::clone(&self.tokens);
        let jobs = self.jobs.clone();
        let batch_size = self.config.effective_batch_size();

        tokio::spawn(async move {
            let outcome =
                execute_selection(store.as_ref(), &record, action, options, batch_size).await;

            if record.single_use && !outcome.is_aborted() {
                // Consumption failure only delays cleanup until TTL expiry.
                let _ = tokens.invalidate(token);
            }

            info!(%job, attempted = outcome.attempted, "bulk job finished");
            let _ = jobs.finish(job, outcome);
        });

        Ok(job)
    }

    /// Current status of a background job.
    pub fn job_status(&self, job: JobId) -> Result<JobStatus, Error> {
        self.jobs.status(job)?.ok_or_else(|| {
            Error::new(
                ErrorKind::Job(JobErrorKind::NotFound),
                ErrorOrigin::Service,
                format!("unknown bulk job: {job}"),
            )
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn execute_options(&self) -> ExecuteOptions {
        ExecuteOptions {
            concurrency: self.config.concurrency,
            failed_report_cap: self.config.failed_report_cap,
            ..ExecuteOptions::default()
        }
    }

    fn consume_if_single_use(
        &self,
        token: TokenId,
        record: &TokenRecord,
        outcome: &BulkOutcome,
    ) -> Result<(), Error> {
        if record.single_use && !outcome.is_aborted() {
            self.tokens.invalidate(token)?;
        }

        Ok(())
    }
}

/// Resolve a token record into a stream and execute the action over it.
async fn execute_selection<S, A, F>(
    store: &S,
    record: &TokenRecord,
    action: A,
    options: ExecuteOptions,
    batch_size: usize,
) -> BulkOutcome
where
    S: RecordStore + ?Sized,
    A: Fn(RecordId) -> F + Send,
    F: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    let resolver = Resolver::new(store, batch_size);
    let stream = resolver.resolve(&record.filter, &record.selection, record.basis);

    BulkExecutor::new(options).execute(stream, action).await
}
