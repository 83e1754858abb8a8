//! List view state: query, fetch cycle, selection and display preferences.

mod controller;
mod prefs;
mod selection;
mod state;

pub use controller::{ListPhase, ListQueryController, ListSnapshot, LoadOutcome};
pub use prefs::{Density, ViewMode, ViewPreferences};
pub use selection::SelectionModel;
pub use state::{
    DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT, ListConfig, MAX_PAGE_SIZE, QueryState, SortOrder,
};
