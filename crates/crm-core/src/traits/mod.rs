//! Core traits for the remote collection boundary and user notifications.

mod collection;
mod notifier;

pub use collection::Collection;
pub use notifier::{Notice, NoticeLevel, Notifier, TracingNotifier};
