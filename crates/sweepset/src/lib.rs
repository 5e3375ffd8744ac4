//! Sweepset lets a client express "all records matching a filter, minus a
//! few exclusions" without ever enumerating them, then resolves that
//! expression server-side into a concrete stream of record ids for a bulk
//! operation.
//!
//! ## Crate layout
//! - `core` (re-export of `sweepset-core`): values, filters, selection
//!   state, stores, resolver, executor.
//! - `error`: the stable public error taxonomy.
//! - `config`: operational knobs for one service instance.
//! - `service`: the [`service::SelectionService`] session surface — token
//!   minting, estimates, bulk execution, job polling.
//!
//! The `prelude` mirrors the vocabulary a host process uses day to day.

pub use sweepset_core as core;

pub mod config;
pub mod error;
pub mod service;

// re-exports
pub use config::ServiceConfig;
pub use error::{Error, ErrorKind, ErrorOrigin};
pub use service::{JobStatus, SelectionService};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        config::ServiceConfig,
        core::{
            executor::{ActionError, BulkOutcome, BulkStatus, ExecuteOptions},
            filter::FilterDescriptor,
            schema::{CollectionSchema, FieldType},
            selection::SelectionState,
            snapshot::SnapshotBasis,
            store::{MemoryRecordStore, Record, RecordStore},
            token::SelectionToken,
            types::{JobId, RecordId, TokenId},
        },
        error::{Error, ErrorKind},
        service::{JobStatus, SelectionService},
    };
}
