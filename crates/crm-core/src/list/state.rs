//! Query state and list configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, InvalidInputError};
use crate::filter::{FieldDescriptor, Filter, QueryParams, serialize};

/// Page size the list uses unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Largest page size the backend accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Per-fetch timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(InvalidInputError::Other {
                message: format!("sort order must be 'asc' or 'desc', got '{}'", s),
            }
            .into()),
        }
    }
}

/// Everything that determines which page of records the list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    /// Live contents of the search box. Never sent.
    pub search_term: String,
    /// The committed search; only this reaches the server.
    pub active_search: String,
    pub sort_by: String,
    pub sort_order: SortOrder,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    pub filters: Vec<Filter>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::from_config(&ListConfig::default())
    }
}

impl QueryState {
    /// Initial state for a list configured by `config`.
    pub fn from_config(config: &ListConfig) -> Self {
        Self {
            search_term: String::new(),
            active_search: String::new(),
            sort_by: config.sort_by.clone(),
            sort_order: config.sort_order,
            page: 1,
            page_size: config.page_size,
            filters: Vec::new(),
        }
    }

    /// Parameters for the remote `list` call:
    /// `page`, `page_size`, `q` (only when a search is committed),
    /// `sort_by`, `sort_order`, then the positional filter parameters.
    pub fn fetch_params(&self, catalog: &[FieldDescriptor]) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("page", self.page.to_string());
        params.push("page_size", self.page_size.to_string());
        if !self.active_search.is_empty() {
            params.push("q", self.active_search.as_str());
        }
        params.push("sort_by", self.sort_by.as_str());
        params.push("sort_order", self.sort_order.as_str());
        params.extend(serialize(&self.filters, catalog));
        params
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = clamp_page_size(self.page_size);
        self
    }
}

/// Settings for one list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub page_size: u32,
    /// Upper bound on a single `list` call.
    pub timeout: Duration,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
            sort_by: "created_at".to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

impl ListConfig {
    /// Set the page size, clamped to what the backend accepts.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = clamp_page_size(page_size);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by.into();
        self.sort_order = sort_order;
        self
    }
}

fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}
