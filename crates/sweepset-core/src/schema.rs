use crate::value::{Value, ValueFamily};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// FieldType
///
/// Scalar classification for schema fields. Deliberately smaller than a
/// full type system; it exists only to support literal compatibility checks
/// and operator validity during filter validation.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Bool,
    Int,
    Uint,
    Text,
    Ulid,
}

impl FieldType {
    /// Whether a scalar literal is a valid operand for this field type.
    #[must_use]
    pub const fn matches_value(self, value: &Value) -> bool {
        matches!(
            (self, value.family()),
            (Self::Bool, ValueFamily::Bool)
                | (Self::Int, ValueFamily::Int)
                | (Self::Uint, ValueFamily::Uint)
                | (Self::Text, ValueFamily::Text)
                | (Self::Ulid, ValueFamily::Ulid)
        )
    }

    /// Whether range operators (`Lt`/`Lte`/`Gt`/`Gte`) are defined for
    /// this field type.
    #[must_use]
    pub const fn supports_ordering(self) -> bool {
        match self {
            Self::Int | Self::Uint | Self::Text | Self::Ulid => true,
            Self::Bool => false,
        }
    }

    /// Whether substring matching (`Contains`) is defined for this type.
    #[must_use]
    pub const fn supports_text_match(self) -> bool {
        matches!(self, Self::Text)
    }
}

///
/// CollectionSchema
///
/// The typing contract for one record collection: the collection name plus
/// its filterable fields. Filters are validated against this before any
/// token is minted, so evaluation downstream never has to re-check shapes.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CollectionSchema {
    name: String,
    fields: BTreeMap<String, FieldType>,
}

impl CollectionSchema {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a filterable field. Last write wins on duplicate names.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.fields.get(field).copied()
    }

    #[must_use]
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
