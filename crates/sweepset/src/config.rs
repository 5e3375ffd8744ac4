use serde::{Deserialize, Serialize};
use time::Duration;

/// Resolver batch sizing band. Batches bound memory per pull; anything
/// outside this band is clamped rather than rejected.
pub const MIN_BATCH_SIZE: usize = 500;
pub const MAX_BATCH_SIZE: usize = 5_000;

///
/// ServiceConfig
///
/// Operational knobs for one `SelectionService`. Constructed
/// programmatically; the service embeds in a host process and has no
/// config-file layer of its own.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ServiceConfig {
    /// TTL for minted selection tokens.
    pub token_ttl: Duration,

    /// Resolver batch size; clamped into the batching band at use.
    pub batch_size: usize,

    /// Default per-execution action concurrency.
    pub concurrency: usize,

    /// Max failed records listed per outcome; the rest are counted.
    pub failed_report_cap: usize,

    /// Mint single-use tokens: consumed on first successful execution.
    pub single_use_tokens: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::minutes(30),
            batch_size: MIN_BATCH_SIZE,
            concurrency: 8,
            failed_report_cap: 1_000,
            single_use_tokens: false,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub const fn token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    #[must_use]
    pub const fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub const fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub const fn failed_report_cap(mut self, cap: usize) -> Self {
        self.failed_report_cap = cap;
        self
    }

    #[must_use]
    pub const fn single_use_tokens(mut self, single_use: bool) -> Self {
        self.single_use_tokens = single_use;
        self
    }

    /// Batch size clamped into the batching band.
    #[must_use]
    pub const fn effective_batch_size(&self) -> usize {
        if self.batch_size < MIN_BATCH_SIZE {
            MIN_BATCH_SIZE
        } else if self.batch_size > MAX_BATCH_SIZE {
            MAX_BATCH_SIZE
        } else {
            self.batch_size
        }
    }
}
