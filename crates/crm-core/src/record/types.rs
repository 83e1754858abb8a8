//! Record and list-page types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::RecordId;

/// A record as returned by the remote API.
///
/// The shape beyond `id` is schema-agnostic; interpretation is left to
/// columns and higher layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a record from a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The record identifier, if the payload carries a numeric `id`.
    pub fn id(&self) -> Option<RecordId> {
        self.0.get("id").and_then(Value::as_i64).map(RecordId::new)
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Text shown for a column cell.
    ///
    /// `full_name` falls back to first and last name when the server did not
    /// compute it. Nulls and missing fields render as an empty string.
    pub fn display_value(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::Null) | None if key == "full_name" => {
                let first = self.text("first_name");
                let last = self.text("last_name");
                format!("{} {}", first, last).trim().to_string()
            }
            Some(value) => render(value),
            None => String::new(),
        }
    }

    /// All fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn text(&self, key: &str) -> String {
        self.0.get(key).map(render).unwrap_or_default()
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One page of a list query, as returned by the server.
///
/// Replaces the controller's previous result wholesale on each fetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageResult {
    /// Records on this page.
    pub items: Vec<Record>,
    /// Total number of records matching the query.
    pub total: u64,
    /// Total number of pages; zero when nothing matches.
    pub pages: u32,
}

impl PageResult {
    /// Identifiers of the records on this page, in order.
    pub fn ids(&self) -> Vec<RecordId> {
        self.items.iter().filter_map(Record::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_name_falls_back_to_parts() {
        let record = Record::from_value(json!({
            "id": 7,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "full_name": null
        }))
        .unwrap();

        assert_eq!(record.id(), Some(RecordId::new(7)));
        assert_eq!(record.display_value("full_name"), "Ada Lovelace");
    }

    #[test]
    fn display_values_render_scalars() {
        let record = Record::from_value(json!({
            "id": 1,
            "amount": 1250.5,
            "is_escalated": true,
            "owner_alias": null
        }))
        .unwrap();

        assert_eq!(record.display_value("amount"), "1250.5");
        assert_eq!(record.display_value("is_escalated"), "true");
        assert_eq!(record.display_value("owner_alias"), "");
        assert_eq!(record.display_value("missing"), "");
    }

    #[test]
    fn page_result_ignores_extra_server_fields() {
        let page: PageResult = serde_json::from_value(json!({
            "items": [{"id": 1}, {"id": 2}],
            "total": 2,
            "page": 1,
            "page_size": 25,
            "pages": 1
        }))
        .unwrap();

        assert_eq!(page.ids(), vec![RecordId::new(1), RecordId::new(2)]);
        assert_eq!(page.pages, 1);
    }
}
