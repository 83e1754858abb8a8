//! crm-http - REST-backed record collections.
//!
//! [`CrmApi`] holds the base URL and bearer token; [`HttpCollection`] is the
//! per-record-type [`Collection`](crm_core::Collection) over
//! `/api/{contacts,accounts,leads,opportunities,cases}`.

mod api;
mod client;
mod collection;

pub use api::{AccessToken, CrmApi, CurrentUser};
pub use collection::{ConversionResult, HttpCollection, LeadConversion};
