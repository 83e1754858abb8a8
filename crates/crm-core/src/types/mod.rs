//! Core value types.
//!
//! These types validate at construction time so the rest of the crate can
//! rely on well-formed URLs, record types and identifiers.

mod api_url;
mod record_id;
mod record_type;

pub use api_url::ApiUrl;
pub use record_id::RecordId;
pub use record_type::RecordType;
