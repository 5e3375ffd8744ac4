use serde::{Deserialize, Serialize};
use sweepset_core::{
    filter::FilterError, resolver::ResolveError, store::StoreError, token::TokenError,
};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// The caller cannot remediate this.
    pub(crate) fn internal(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, origin, message)
    }
}

impl From<FilterError> for Error {
    fn from(err: FilterError) -> Self {
        let kind = match &err {
            FilterError::UnknownField { .. } => FilterErrorKind::UnknownField,
            FilterError::TypeMismatch { .. } | FilterError::ListRequired { .. } => {
                FilterErrorKind::Invalid
            }
            FilterError::UnsupportedOperator { .. } => FilterErrorKind::Unsupported,
        };

        Self::new(ErrorKind::Filter(kind), ErrorOrigin::Filter, err.to_string())
    }
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        let kind = match &err {
            TokenError::NotFound => TokenErrorKind::NotFound,
            TokenError::Expired => TokenErrorKind::Expired,
            TokenError::Unavailable { .. } => TokenErrorKind::Unavailable,
        };

        Self::new(ErrorKind::Token(kind), ErrorOrigin::Token, err.to_string())
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        let kind = match &err {
            StoreError::Unavailable { .. } => StoreErrorKind::Unavailable,
            StoreError::SnapshotUnavailable { .. } => StoreErrorKind::SnapshotUnavailable,
        };

        Self::new(ErrorKind::Store(kind), ErrorOrigin::Store, err.to_string())
    }
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Store(err) => err.into(),

            ResolveError::Interrupted { .. } => Self::new(
                ErrorKind::Resolve(ResolveErrorKind::Interrupted),
                ErrorOrigin::Resolver,
                err.to_string(),
            ),
        }
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Filter(FilterErrorKind),
    Token(TokenErrorKind),
    Store(StoreErrorKind),
    Resolve(ResolveErrorKind),
    Job(JobErrorKind),

    /// The caller cannot remediate this.
    Internal,
}

///
/// FilterErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FilterErrorKind {
    /// A constraint references a field the schema does not declare.
    UnknownField,

    /// Constraint shape is invalid (bad literal family, scalar where a
    /// list is required).
    Invalid,

    /// The operator is not defined for the field's type.
    Unsupported,
}

///
/// TokenErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TokenErrorKind {
    /// Unknown handle: a caller bug, not a retry case.
    NotFound,

    /// TTL elapsed: the user should re-select and retry.
    Expired,

    /// Transient token-store failure; retry with backoff.
    Unavailable,
}

///
/// StoreErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    Unavailable,
    SnapshotUnavailable,
}

///
/// ResolveErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ResolveErrorKind {
    /// Mid-stream store failure; partial results were preserved by the
    /// executor and reported in the outcome.
    Interrupted,
}

///
/// JobErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum JobErrorKind {
    NotFound,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Filter,
    Token,
    Store,
    Resolver,
    Executor,
    Service,
}
