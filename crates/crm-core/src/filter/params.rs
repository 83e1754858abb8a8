//! Ordered query parameters and the positional filter wire format.

use serde::Serialize;
use tracing::debug;

use super::catalog::FieldDescriptor;
use super::predicate::Filter;

/// Query parameters in insertion order.
///
/// Serializes as a sequence of key/value pairs, which is what URL-encoded
/// query serializers expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn extend(&mut self, other: QueryParams) {
        self.0.extend(other.0);
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` rendering, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// Encode `filters` as `filter_{i}_field` / `filter_{i}_op` / `filter_{i}_value`.
///
/// Rows that fail validation against `catalog` are dropped without error.
/// Surviving rows are numbered from zero in array order. The value parameter
/// is omitted for valueless operators.
pub fn serialize(filters: &[Filter], catalog: &[FieldDescriptor]) -> QueryParams {
    let mut params = QueryParams::new();
    let mut index = 0;

    for filter in filters {
        if let Err(reason) = filter.validate(catalog) {
            debug!(filter = %filter, %reason, "dropping filter row");
            continue;
        }

        params.push(format!("filter_{index}_field"), filter.field.as_str());
        params.push(format!("filter_{index}_op"), filter.operator.as_str());
        if !filter.operator.is_valueless() {
            params.push(format!("filter_{index}_value"), filter.value.as_str());
        }
        index += 1;
    }

    params
}
