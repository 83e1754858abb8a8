//! Filter rows and their validation against a field catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError, ValidationError};

use super::catalog::{FieldDescriptor, find_field};
use super::operator::Operator;

/// A single `field operator value` predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Switch to another field. The old value no longer applies and is cleared.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self.value.clear();
        self
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Check this row against `catalog`.
    pub fn validate<'a>(
        &self,
        catalog: &'a [FieldDescriptor],
    ) -> Result<&'a FieldDescriptor, ValidationError> {
        let field = find_field(catalog, &self.field).ok_or_else(|| {
            ValidationError::UnknownField {
                field: self.field.clone(),
            }
        })?;

        if !field.operators().contains(&self.operator) {
            return Err(ValidationError::IllegalOperator {
                field: self.field.clone(),
                operator: self.operator,
            });
        }

        if self.value.is_empty() && !self.operator.is_valueless() {
            return Err(ValidationError::MissingValue {
                field: self.field.clone(),
                operator: self.operator,
            });
        }

        Ok(field)
    }
}

/// Validate `filter` against `catalog`, returning it unchanged on success.
///
/// # Errors
///
/// - [`ValidationError::UnknownField`] if the field is not in the catalog
/// - [`ValidationError::IllegalOperator`] if the operator is not legal for the field's type
/// - [`ValidationError::MissingValue`] if the value is empty and the operator needs one
pub fn validate<'f>(
    filter: &'f Filter,
    catalog: &[FieldDescriptor],
) -> Result<&'f Filter, ValidationError> {
    filter.validate(catalog).map(|_| filter)
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator.is_valueless() {
            write!(f, "{}:{}", self.field, self.operator)
        } else {
            write!(f, "{}:{}:{}", self.field, self.operator, self.value)
        }
    }
}

/// Parses `field:operator[:value]`. The value may itself contain colons.
impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let field = parts.next().unwrap_or_default().trim();
        let operator = parts.next().ok_or_else(|| InvalidInputError::Other {
            message: format!("filter '{}' must look like field:operator[:value]", s),
        })?;
        let value = parts.next().unwrap_or_default();

        Ok(Filter::new(field, operator.trim().parse()?, value))
    }
}
