use crate::types::RecordId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// Value
///
/// Scalar literal used in filter constraints and record fields.
/// Comparison is strict: values compare only within their own family, and
/// an invalid comparison yields no result rather than an error or a silent
/// coercion.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
    Ulid(RecordId),
    List(Vec<Value>),
}

///
/// ValueFamily
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueFamily {
    Null,
    Bool,
    Int,
    Uint,
    Text,
    Ulid,
    List,
}

impl Value {
    #[must_use]
    pub const fn family(&self) -> ValueFamily {
        match self {
            Self::Null => ValueFamily::Null,
            Self::Bool(_) => ValueFamily::Bool,
            Self::Int(_) => ValueFamily::Int,
            Self::Uint(_) => ValueFamily::Uint,
            Self::Text(_) => ValueFamily::Text,
            Self::Ulid(_) => ValueFamily::Ulid,
            Self::List(_) => ValueFamily::List,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Scalar equality within one family. `None` when the comparison is
    /// not defined (cross-family, null, or list operands).
    #[must_use]
    pub fn compare_eq(&self, other: &Self) -> Option<bool> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a == b),
            (Self::Int(a), Self::Int(b)) => Some(a == b),
            (Self::Uint(a), Self::Uint(b)) => Some(a == b),
            (Self::Text(a), Self::Text(b)) => Some(a == b),
            (Self::Ulid(a), Self::Ulid(b)) => Some(a == b),
            _ => None,
        }
    }

    /// Scalar ordering within one orderable family. `None` when ordering
    /// is not defined for the operand pair.
    #[must_use]
    pub fn compare_order(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Uint(a), Self::Uint(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Ulid(a), Self::Ulid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Case-sensitive substring match. `None` unless both operands are text.
    #[must_use]
    pub fn text_contains(&self, needle: &Self) -> Option<bool> {
        match (self, needle) {
            (Self::Text(hay), Self::Text(needle)) => Some(hay.contains(needle.as_str())),
            _ => None,
        }
    }

    /// Membership of `self` in a list literal. `None` when `list` is not a
    /// list or no element is comparable to `self`.
    #[must_use]
    pub fn in_list(&self, list: &Self) -> Option<bool> {
        let Self::List(items) = list else {
            return None;
        };

        let mut comparable = false;
        for item in items {
            match self.compare_eq(item) {
                Some(true) => return Some(true),
                Some(false) => comparable = true,
                None => {}
            }
        }

        if comparable || items.is_empty() {
            Some(false)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<RecordId> for Value {
    fn from(v: RecordId) -> Self {
        Self::Ulid(v)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
