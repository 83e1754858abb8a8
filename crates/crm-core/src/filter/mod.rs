//! Filter predicate model.
//!
//! Per record type, the set of filterable fields, their value types and the
//! operators legal for each type, plus validation and the positional query
//! parameter encoding the backend expects. Everything here is pure and
//! stateless; the tables are plain lookups keyed by record type and value
//! type.

mod catalog;
mod operator;
mod params;
mod predicate;

pub use catalog::{
    ColumnDescriptor, FieldDescriptor, SortOption, columns_for, fields_for, find_field,
    is_sortable, sort_options,
};
pub use operator::{Operator, ValueType, is_valueless_operator, operators_for, operators_for_name};
pub use params::{QueryParams, serialize};
pub use predicate::{Filter, validate};
