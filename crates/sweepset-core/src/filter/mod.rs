pub(crate) mod eval;
pub(crate) mod validate;

#[cfg(test)]
mod tests;

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

// re-exports
pub use eval::{FieldLookup, FieldPresence};
pub use validate::FilterError;

///
/// CompareOp
///
/// Operator vocabulary for filter constraints. Equality, range, and
/// set-membership only; text substring match is the one collection-flavored
/// addition. No disjunction and no negation of whole filters.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Contains,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Contains => "contains",
        };

        f.write_str(s)
    }
}

///
/// Constraint
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Constraint {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

///
/// FilterDescriptor
///
/// Serialized, deterministic predicate over a record collection: an ordered
/// conjunction of field constraints. Immutable once attached to a selection;
/// a changed filter is a new descriptor, never a mutation.
///
/// Evaluation is pure and total: a missing field or an undefined comparison
/// is a non-match, never an error. Shape errors are caught up front by
/// [`FilterDescriptor::validate`].
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FilterDescriptor {
    constraints: Vec<Constraint>,
}

impl FilterDescriptor {
    /// The empty conjunction: matches every record.
    #[must_use]
    pub const fn match_all() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Evaluate this descriptor against a single row. Pure read; validated
    /// descriptors only.
    #[must_use]
    pub fn matches<R: FieldLookup + ?Sized>(&self, row: &R) -> bool {
        self.constraints.iter().all(|c| eval::constraint_matches(row, c))
    }

    // ─────────────────────────────────────────────────────────────
    // Fluent constructors
    // ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        self.constraints.push(Constraint {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, CompareOp::Eq, value)
    }

    #[must_use]
    pub fn ne(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, CompareOp::Ne, value)
    }

    #[must_use]
    pub fn lt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, CompareOp::Lte, value)
    }

    #[must_use]
    pub fn gt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, CompareOp::Gte, value)
    }

    #[must_use]
    pub fn in_list(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        let list = Value::List(values.into_iter().map(Into::into).collect());
        self.with(field, CompareOp::In, list)
    }

    #[must_use]
    pub fn not_in(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        let list = Value::List(values.into_iter().map(Into::into).collect());
        self.with(field, CompareOp::NotIn, list)
    }

    #[must_use]
    pub fn contains(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, CompareOp::Contains, value)
    }
}
