//! Column visibility, row density and view mode.
//!
//! Purely local UI state; nothing here talks to the server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::filter::{ColumnDescriptor, columns_for};
use crate::types::RecordType;

/// Vertical spacing of list rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    #[default]
    Comfortable,
    Spacious,
}

impl Density {
    pub const ALL: [Density; 3] = [Density::Compact, Density::Comfortable, Density::Spacious];

    pub fn as_str(self) -> &'static str {
        match self {
            Density::Compact => "compact",
            Density::Comfortable => "comfortable",
            Density::Spacious => "spacious",
        }
    }

    /// Spaces between cells when rendered as text.
    pub fn cell_gap(self) -> usize {
        match self {
            Density::Compact => 1,
            Density::Comfortable => 2,
            Density::Spacious => 4,
        }
    }

    /// Blank lines between rows when rendered as text.
    pub fn row_gap(self) -> usize {
        match self {
            Density::Compact | Density::Comfortable => 0,
            Density::Spacious => 1,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Density {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Density::ALL
            .into_iter()
            .find(|d| d.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| {
                InvalidInputError::Density {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

/// Table rows or one card per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Grid,
}

/// Per-list display preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPreferences {
    columns: &'static [ColumnDescriptor],
    visible: Vec<&'static str>,
    density: Density,
    view_mode: ViewMode,
}

impl ViewPreferences {
    /// All columns visible, comfortable density, table view.
    pub fn new(columns: &'static [ColumnDescriptor]) -> Self {
        Self {
            columns,
            visible: columns.iter().map(|c| c.key).collect(),
            density: Density::default(),
            view_mode: ViewMode::default(),
        }
    }

    pub fn for_record_type(record_type: RecordType) -> Self {
        Self::new(columns_for(record_type))
    }

    /// Show or hide one column.
    ///
    /// Returns false and changes nothing if `key` is unknown or hiding it
    /// would leave no visible column.
    pub fn toggle_column(&mut self, key: &str) -> bool {
        let Some(column) = self.columns.iter().find(|c| c.key == key) else {
            return false;
        };

        if let Some(pos) = self.visible.iter().position(|k| *k == key) {
            if self.visible.len() == 1 {
                return false;
            }
            self.visible.remove(pos);
        } else {
            self.visible.push(column.key);
        }
        true
    }

    /// Replace the visible set. Unknown keys are ignored.
    ///
    /// Returns false and changes nothing if no known column remains.
    pub fn set_visible_columns<I, S>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut visible: Vec<&'static str> = Vec::new();
        for key in keys {
            if let Some(column) = self.columns.iter().find(|c| c.key == key.as_ref())
                && !visible.contains(&column.key)
            {
                visible.push(column.key);
            }
        }

        if visible.is_empty() {
            return false;
        }
        self.visible = visible;
        true
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.iter().any(|k| *k == key)
    }

    /// Visible columns in catalog order.
    pub fn visible_columns(&self) -> Vec<&'static ColumnDescriptor> {
        self.columns
            .iter()
            .filter(|c| self.visible.contains(&c.key))
            .collect()
    }

    pub fn columns(&self) -> &'static [ColumnDescriptor] {
        self.columns
    }

    pub fn set_density(&mut self, density: Density) {
        self.density = density;
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Back to all columns and comfortable density.
    pub fn reset(&mut self) {
        *self = Self::new(self.columns);
    }
}
