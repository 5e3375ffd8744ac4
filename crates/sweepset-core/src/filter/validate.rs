use crate::{
    filter::{CompareOp, Constraint, FilterDescriptor},
    schema::{CollectionSchema, FieldType},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// FilterError
///
/// Shape errors for a filter descriptor, caught before any token is minted
/// or any stream is opened. Fatal to the operation; never retried.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum FilterError {
    #[error("unknown field: {field}")]
    UnknownField { field: String },

    #[error("operator {op} is not defined for field {field} ({ty:?})")]
    UnsupportedOperator {
        field: String,
        op: CompareOp,
        ty: FieldType,
    },

    #[error("literal {value:?} is not a valid {ty:?} operand for field {field}")]
    TypeMismatch {
        field: String,
        ty: FieldType,
        value: Value,
    },

    #[error("operator {op} on field {field} requires a list literal")]
    ListRequired { field: String, op: CompareOp },
}

impl FilterDescriptor {
    /// Validate every constraint against the collection schema.
    ///
    /// Fails on the first offending constraint, in descriptor order, so the
    /// reported error is deterministic for a given (filter, schema) pair.
    pub fn validate(&self, schema: &CollectionSchema) -> Result<(), FilterError> {
        for constraint in self.constraints() {
            validate_constraint(constraint, schema)?;
        }

        Ok(())
    }
}

fn validate_constraint(constraint: &Constraint, schema: &CollectionSchema) -> Result<(), FilterError> {
    let Constraint { field, op, value } = constraint;

    let Some(ty) = schema.field_type(field) else {
        return Err(FilterError::UnknownField {
            field: field.clone(),
        });
    };

    match op {
        CompareOp::Eq | CompareOp::Ne => require_operand(field, ty, value),

        CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte => {
            if !ty.supports_ordering() {
                return Err(FilterError::UnsupportedOperator {
                    field: field.clone(),
                    op: *op,
                    ty,
                });
            }

            require_operand(field, ty, value)
        }

        CompareOp::In | CompareOp::NotIn => {
            let Some(items) = value.as_list() else {
                return Err(FilterError::ListRequired {
                    field: field.clone(),
                    op: *op,
                });
            };

            for item in items {
                require_operand(field, ty, item)?;
            }

            Ok(())
        }

        CompareOp::Contains => {
            if !ty.supports_text_match() {
                return Err(FilterError::UnsupportedOperator {
                    field: field.clone(),
                    op: *op,
                    ty,
                });
            }

            require_operand(field, ty, value)
        }
    }
}

fn require_operand(field: &str, ty: FieldType, value: &Value) -> Result<(), FilterError> {
    if ty.matches_value(value) {
        Ok(())
    } else {
        Err(FilterError::TypeMismatch {
            field: field.to_string(),
            ty,
            value: value.clone(),
        })
    }
}
