//! Record and page types.
//!
//! Records are opaque JSON objects; the client only looks at the fields
//! referenced by columns and filters. Remote operations are methods on
//! [`Collection`](crate::Collection).

mod types;

pub use types::{PageResult, Record};
