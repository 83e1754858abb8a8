//! Value types and the operators legal for each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigurationError, Error, InvalidInputError};

/// The kind of value a filterable field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Select,
    Number,
    Date,
    Boolean,
}

impl ValueType {
    pub const ALL: [ValueType; 5] = [
        ValueType::Text,
        ValueType::Select,
        ValueType::Number,
        ValueType::Date,
        ValueType::Boolean,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Select => "select",
            ValueType::Number => "number",
            ValueType::Date => "date",
            ValueType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownValueType {
                value: s.to_string(),
            })
    }
}

/// A comparison operator in a filter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Contains,
    Equals,
    NotEquals,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    LessThan,
    Between,
    Before,
    After,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    ThisMonth,
    ThisYear,
}

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Contains,
    Operator::Equals,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const SELECT_OPERATORS: &[Operator] = &[Operator::Equals, Operator::NotEquals];

const NUMBER_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::Between,
];

const DATE_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::Before,
    Operator::After,
    Operator::Last7Days,
    Operator::Last30Days,
    Operator::ThisMonth,
    Operator::ThisYear,
];

const BOOLEAN_OPERATORS: &[Operator] = &[Operator::Equals];

impl Operator {
    pub const ALL: [Operator; 16] = [
        Operator::Contains,
        Operator::Equals,
        Operator::NotEquals,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::Between,
        Operator::Before,
        Operator::After,
        Operator::Last7Days,
        Operator::Last30Days,
        Operator::ThisMonth,
        Operator::ThisYear,
    ];

    /// Wire name, as sent in `filter_{i}_op`.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Contains => "contains",
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::Between => "between",
            Operator::Before => "before",
            Operator::After => "after",
            Operator::Last7Days => "last_7_days",
            Operator::Last30Days => "last_30_days",
            Operator::ThisMonth => "this_month",
            Operator::ThisYear => "this_year",
        }
    }

    /// Label shown in an operator picker for a field of `value_type`.
    pub fn label(self, value_type: ValueType) -> &'static str {
        match (self, value_type) {
            (Operator::Equals, ValueType::Boolean) => "is",
            (Operator::NotEquals, _) => "not equals",
            (Operator::StartsWith, _) => "starts with",
            (Operator::EndsWith, _) => "ends with",
            (Operator::IsEmpty, _) => "is empty",
            (Operator::IsNotEmpty, _) => "is not empty",
            (Operator::GreaterThan, _) => "greater than",
            (Operator::LessThan, _) => "less than",
            (Operator::Last7Days, _) => "last 7 days",
            (Operator::Last30Days, _) => "last 30 days",
            (Operator::ThisMonth, _) => "this month",
            (Operator::ThisYear, _) => "this year",
            (op, _) => op.as_str(),
        }
    }

    /// True if the operator needs no comparison value.
    pub fn is_valueless(self) -> bool {
        matches!(
            self,
            Operator::IsEmpty
                | Operator::IsNotEmpty
                | Operator::Last7Days
                | Operator::Last30Days
                | Operator::ThisMonth
                | Operator::ThisYear
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| {
                InvalidInputError::Operator {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

/// Operators legal for a value type, in picker order.
pub fn operators_for(value_type: ValueType) -> &'static [Operator] {
    match value_type {
        ValueType::Text => TEXT_OPERATORS,
        ValueType::Select => SELECT_OPERATORS,
        ValueType::Number => NUMBER_OPERATORS,
        ValueType::Date => DATE_OPERATORS,
        ValueType::Boolean => BOOLEAN_OPERATORS,
    }
}

/// Operators for a value type given by name.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownValueType`] for names outside the
/// five known value types.
pub fn operators_for_name(value_type: &str) -> Result<&'static [Operator], ConfigurationError> {
    value_type.parse::<ValueType>().map(operators_for)
}

/// True if `operator` needs no comparison value.
pub fn is_valueless_operator(operator: Operator) -> bool {
    operator.is_valueless()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_names_roundtrip() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.as_str()));
        }
        assert!("like".parse::<Operator>().is_err());
    }

    #[test]
    fn exactly_six_valueless_operators() {
        let valueless: Vec<_> = Operator::ALL
            .into_iter()
            .filter(|op| is_valueless_operator(*op))
            .collect();
        assert_eq!(
            valueless,
            vec![
                Operator::IsEmpty,
                Operator::IsNotEmpty,
                Operator::Last7Days,
                Operator::Last30Days,
                Operator::ThisMonth,
                Operator::ThisYear,
            ]
        );
    }

    #[test]
    fn operator_sets_per_value_type() {
        assert_eq!(operators_for(ValueType::Text).len(), 6);
        assert_eq!(
            operators_for(ValueType::Select),
            &[Operator::Equals, Operator::NotEquals]
        );
        assert!(operators_for(ValueType::Number).contains(&Operator::Between));
        assert!(operators_for(ValueType::Date).contains(&Operator::ThisYear));
        assert_eq!(operators_for(ValueType::Boolean), &[Operator::Equals]);
    }

    #[test]
    fn unknown_value_type_is_a_configuration_error() {
        assert_eq!(
            operators_for_name("currency").unwrap_err(),
            ConfigurationError::UnknownValueType {
                value: "currency".to_string()
            }
        );
        assert_eq!(operators_for_name("date").unwrap().len(), 7);
    }

    #[test]
    fn boolean_equals_reads_as_is() {
        assert_eq!(Operator::Equals.label(ValueType::Boolean), "is");
        assert_eq!(Operator::Equals.label(ValueType::Text), "equals");
        assert_eq!(Operator::Last7Days.label(ValueType::Date), "last 7 days");
    }
}
