//! Static field and column catalogs per record type.

use serde::Serialize;

use crate::types::RecordType;

use super::operator::{Operator, ValueType, operators_for};
use super::predicate::Filter;

/// A filterable field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub value_type: ValueType,
    /// Allowed values for `select` fields; empty otherwise.
    #[serde(skip_serializing_if = "has_no_options")]
    pub options: &'static [&'static str],
}

fn has_no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

impl FieldDescriptor {
    const fn new(key: &'static str, label: &'static str, value_type: ValueType) -> Self {
        Self {
            key,
            label,
            value_type,
            options: &[],
        }
    }

    const fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            label,
            value_type: ValueType::Select,
            options,
        }
    }

    /// Operators legal on this field.
    pub fn operators(&self) -> &'static [Operator] {
        operators_for(self.value_type)
    }

    /// The row an "add filter" action starts with.
    pub fn default_filter(&self) -> Filter {
        Filter::new(self.key, Operator::Contains, "")
    }
}

/// A list column of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

impl ColumnDescriptor {
    const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: true,
        }
    }

    // Derived or joined server-side; the backend cannot order by these.
    const fn derived(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: false,
        }
    }
}

/// A key the list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub key: &'static str,
    pub label: &'static str,
}

const CREATED_AT: FieldDescriptor =
    FieldDescriptor::new("created_at", "Created Date", ValueType::Date);

const CONTACT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("first_name", "First Name", ValueType::Text),
    FieldDescriptor::new("last_name", "Last Name", ValueType::Text),
    FieldDescriptor::new("email", "Email", ValueType::Text),
    FieldDescriptor::new("phone", "Phone", ValueType::Text),
    FieldDescriptor::new("account_name", "Account", ValueType::Text),
    CREATED_AT,
];

const ACCOUNT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("name", "Account Name", ValueType::Text),
    FieldDescriptor::select(
        "industry",
        "Industry",
        &[
            "Technology",
            "Finance",
            "Healthcare",
            "Manufacturing",
            "Retail",
            "Electricity Distribution",
            "Energy",
            "Utilities",
            "Other",
        ],
    ),
    FieldDescriptor::new("phone", "Phone", ValueType::Text),
    FieldDescriptor::new("website", "Website", ValueType::Text),
    CREATED_AT,
];

const LEAD_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("first_name", "First Name", ValueType::Text),
    FieldDescriptor::new("last_name", "Last Name", ValueType::Text),
    FieldDescriptor::new("company", "Company", ValueType::Text),
    FieldDescriptor::select(
        "status",
        "Status",
        &["New", "Contacted", "Qualified", "Unqualified", "Converted"],
    ),
    FieldDescriptor::new("email", "Email", ValueType::Text),
    CREATED_AT,
];

const OPPORTUNITY_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("name", "Opportunity Name", ValueType::Text),
    FieldDescriptor::select(
        "stage",
        "Stage",
        &[
            "Prospecting",
            "Qualification",
            "Needs Analysis",
            "Proposal",
            "Negotiation",
            "Closed Won",
            "Closed Lost",
        ],
    ),
    FieldDescriptor::new("amount_min", "Amount (Min)", ValueType::Number),
    FieldDescriptor::new("amount_max", "Amount (Max)", ValueType::Number),
    FieldDescriptor::new("close_date", "Close Date", ValueType::Date),
];

const CASE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("subject", "Subject", ValueType::Text),
    FieldDescriptor::select("status", "Status", &["New", "Working", "Escalated", "Closed"]),
    FieldDescriptor::select("priority", "Priority", &["Low", "Medium", "High", "Critical"]),
    FieldDescriptor::new("is_escalated", "Escalated", ValueType::Boolean),
    CREATED_AT,
];

const CONTACT_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::derived("full_name", "Name"),
    ColumnDescriptor::derived("account_name", "Account Name"),
    ColumnDescriptor::new("phone", "Phone"),
    ColumnDescriptor::new("email", "Email"),
    ColumnDescriptor::derived("owner_alias", "Contact Owner Alias"),
];

const ACCOUNT_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::new("name", "Account Name"),
    ColumnDescriptor::new("phone", "Phone"),
    ColumnDescriptor::new("industry", "Industry"),
    ColumnDescriptor::derived("owner_alias", "Account Owner Alias"),
];

const LEAD_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::derived("full_name", "Name"),
    ColumnDescriptor::new("title", "Title"),
    ColumnDescriptor::new("company", "Company"),
    ColumnDescriptor::new("phone", "Phone"),
    ColumnDescriptor::new("email", "Email"),
    ColumnDescriptor::new("status", "Lead Status"),
    ColumnDescriptor::derived("owner_alias", "Owner Alias"),
];

const OPPORTUNITY_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::new("name", "Opportunity Name"),
    ColumnDescriptor::derived("account_name", "Account Name"),
    ColumnDescriptor::new("amount", "Amount"),
    ColumnDescriptor::new("stage", "Stage"),
    ColumnDescriptor::new("close_date", "Close Date"),
    ColumnDescriptor::derived("owner_alias", "Owner Alias"),
];

const CASE_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::new("case_number", "Case Number"),
    ColumnDescriptor::new("subject", "Subject"),
    ColumnDescriptor::new("priority", "Priority"),
    ColumnDescriptor::new("status", "Status"),
    ColumnDescriptor::new("created_at", "Date/Time Opened"),
    ColumnDescriptor::derived("owner_alias", "Case Owner Alias"),
];

const TIMESTAMP_SORTS: [SortOption; 2] = [
    SortOption {
        key: "created_at",
        label: "Date Created",
    },
    SortOption {
        key: "updated_at",
        label: "Last Modified",
    },
];

/// Filterable fields of a record type, in panel order.
pub fn fields_for(record_type: RecordType) -> &'static [FieldDescriptor] {
    match record_type {
        RecordType::Contact => CONTACT_FIELDS,
        RecordType::Account => ACCOUNT_FIELDS,
        RecordType::Lead => LEAD_FIELDS,
        RecordType::Opportunity => OPPORTUNITY_FIELDS,
        RecordType::Case => CASE_FIELDS,
    }
}

/// List columns of a record type, in display order.
pub fn columns_for(record_type: RecordType) -> &'static [ColumnDescriptor] {
    match record_type {
        RecordType::Contact => CONTACT_COLUMNS,
        RecordType::Account => ACCOUNT_COLUMNS,
        RecordType::Lead => LEAD_COLUMNS,
        RecordType::Opportunity => OPPORTUNITY_COLUMNS,
        RecordType::Case => CASE_COLUMNS,
    }
}

/// Look up a field by key.
pub fn find_field<'a>(catalog: &'a [FieldDescriptor], key: &str) -> Option<&'a FieldDescriptor> {
    catalog.iter().find(|f| f.key == key)
}

/// Keys the list of `record_type` can be sorted by: the two timestamps
/// followed by every sortable column.
pub fn sort_options(record_type: RecordType) -> Vec<SortOption> {
    let mut options = TIMESTAMP_SORTS.to_vec();
    for column in columns_for(record_type).iter().filter(|c| c.sortable) {
        if !options.iter().any(|o| o.key == column.key) {
            options.push(SortOption {
                key: column.key,
                label: column.label,
            });
        }
    }
    options
}

/// True if `key` is one of [`sort_options`] for `record_type`.
pub fn is_sortable(record_type: RecordType, key: &str) -> bool {
    TIMESTAMP_SORTS.iter().any(|o| o.key == key)
        || columns_for(record_type)
            .iter()
            .any(|c| c.key == key && c.sortable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_status_is_a_select_with_five_options() {
        let status = find_field(fields_for(RecordType::Lead), "status").unwrap();
        assert_eq!(status.value_type, ValueType::Select);
        assert_eq!(
            status.options,
            &["New", "Contacted", "Qualified", "Unqualified", "Converted"]
        );
    }

    #[test]
    fn every_value_type_appears_in_some_catalog() {
        for value_type in ValueType::ALL {
            assert!(
                RecordType::ALL
                    .into_iter()
                    .flat_map(fields_for)
                    .any(|f| f.value_type == value_type),
                "no field of type {value_type}"
            );
        }
    }

    #[test]
    fn derived_columns_are_not_sortable() {
        assert!(!is_sortable(RecordType::Lead, "owner_alias"));
        assert!(!is_sortable(RecordType::Contact, "full_name"));
        assert!(is_sortable(RecordType::Lead, "company"));
        assert!(is_sortable(RecordType::Lead, "updated_at"));
        assert!(!is_sortable(RecordType::Lead, "no_such_column"));
    }

    #[test]
    fn sort_options_start_with_timestamps_without_duplicates() {
        let options = sort_options(RecordType::Case);
        assert_eq!(options[0].key, "created_at");
        assert_eq!(options[1].key, "updated_at");
        assert_eq!(
            options.iter().filter(|o| o.key == "created_at").count(),
            1
        );
        assert!(options.iter().any(|o| o.key == "case_number"));
    }

    #[test]
    fn default_filter_uses_contains_and_empty_value() {
        let field = &fields_for(RecordType::Contact)[0];
        let filter = field.default_filter();
        assert_eq!(filter.field, "first_name");
        assert_eq!(filter.operator, Operator::Contains);
        assert!(filter.value.is_empty());
    }
}
