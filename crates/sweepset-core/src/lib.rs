//! Core runtime for Sweepset: scalar values, filter descriptors, the
//! selection state machine, record and token stores, the resolver, and the
//! bulk executor.
//!
//! The crate is layered bottom-up:
//! - `value` / `schema`: scalar literals and the field typing contract.
//! - `filter`: the serialized predicate language, validation, and pure
//!   row evaluation.
//! - `selection`: the manual/all selection state machine.
//! - `store` / `token`: the record-store seam and the TTL-bound token store.
//! - `resolver`: (filter, selection, basis) -> pull-based ID stream.
//! - `executor`: bounded-concurrency bulk execution with partial results.
//!
//! Everything below the executor is synchronous and pure; async enters only
//! where caller-supplied actions perform I/O.

pub mod executor;
pub mod filter;
pub mod resolver;
pub mod schema;
pub mod selection;
pub mod snapshot;
pub mod store;
pub mod token;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Domain vocabulary only. No stores, executors, or error types.
///

pub mod prelude {
    pub use crate::{
        filter::FilterDescriptor,
        schema::{CollectionSchema, FieldType},
        selection::SelectionState,
        snapshot::{SnapshotBasis, SnapshotVersion},
        types::RecordId,
        value::Value,
    };
}
