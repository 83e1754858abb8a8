//! crm-core - Types, catalogs and list-query state for the CRM client.
//!
//! The central piece is [`ListQueryController`], which turns user
//! interactions (search, filter, sort, paging) into query parameters for a
//! remote [`Collection`] and reconciles the responses into view state.
//!
//! # Example
//!
//! ```no_run
//! use crm_core::{Collection, Filter, ListConfig, ListQueryController, Operator};
//!
//! # async fn example(leads: impl Collection) {
//! let controller = ListQueryController::new(leads, ListConfig::default());
//! let _ = controller
//!     .apply_filters(vec![Filter::new("status", Operator::Equals, "New")])
//!     .await;
//!
//! let view = controller.snapshot();
//! println!("{} leads on {} page(s)", view.total, view.pages);
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod list;
pub mod record;
pub mod traits;
pub mod types;

pub use error::Error;
pub use filter::{FieldDescriptor, Filter, Operator, QueryParams, ValueType};
pub use list::{
    Density, ListConfig, ListPhase, ListQueryController, ListSnapshot, LoadOutcome, QueryState,
    SelectionModel, SortOrder, ViewMode, ViewPreferences,
};
pub use record::{PageResult, Record};
pub use traits::{Collection, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use types::{ApiUrl, RecordId, RecordType};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
