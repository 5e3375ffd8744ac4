use crate::{
    filter::{CompareOp, Constraint},
    value::Value,
};
use std::{cmp::Ordering, collections::BTreeMap};

///
/// FieldPresence
///
/// Result of reading a field from a row during evaluation. Distinguishes a
/// missing field from a present field whose value is `Null`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldPresence {
    Present(Value),
    Missing,
}

///
/// FieldLookup
///
/// Abstraction over a row-like value that exposes fields by name. Decouples
/// filter evaluation from any concrete record representation.
///

pub trait FieldLookup {
    fn field(&self, name: &str) -> FieldPresence;
}

impl FieldLookup for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> FieldPresence {
        match self.get(name) {
            Some(value) => FieldPresence::Present(value.clone()),
            None => FieldPresence::Missing,
        }
    }
}

/// Evaluate a single constraint against a row.
///
/// Returns `false` if the field is missing or the comparison is not defined
/// for the operand pair. CONTRACT: constraints are validated before
/// evaluation; this function never errors.
pub(crate) fn constraint_matches<R: FieldLookup + ?Sized>(row: &R, constraint: &Constraint) -> bool {
    let Constraint { field, op, value } = constraint;

    let FieldPresence::Present(actual) = row.field(field) else {
        return false;
    };

    match op {
        CompareOp::Eq => actual.compare_eq(value).unwrap_or(false),
        CompareOp::Ne => actual.compare_eq(value).is_some_and(|v| !v),

        CompareOp::Lt => actual.compare_order(value).is_some_and(Ordering::is_lt),
        CompareOp::Lte => actual.compare_order(value).is_some_and(Ordering::is_le),
        CompareOp::Gt => actual.compare_order(value).is_some_and(Ordering::is_gt),
        CompareOp::Gte => actual.compare_order(value).is_some_and(Ordering::is_ge),

        CompareOp::In => actual.in_list(value).unwrap_or(false),
        CompareOp::NotIn => actual.in_list(value).is_some_and(|matched| !matched),

        CompareOp::Contains => actual.text_contains(value).unwrap_or(false),
    }
}
