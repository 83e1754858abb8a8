//! Record type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// One of the CRM object types, each with its own catalogs and endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Contact,
    Account,
    Lead,
    Opportunity,
    Case,
}

impl RecordType {
    /// All record types, in navigation order.
    pub const ALL: [RecordType; 5] = [
        RecordType::Contact,
        RecordType::Account,
        RecordType::Lead,
        RecordType::Opportunity,
        RecordType::Case,
    ];

    /// Singular lowercase name, as used in routes and catalogs.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Contact => "contact",
            RecordType::Account => "account",
            RecordType::Lead => "lead",
            RecordType::Opportunity => "opportunity",
            RecordType::Case => "case",
        }
    }

    /// Human-readable singular label.
    pub fn label(self) -> &'static str {
        match self {
            RecordType::Contact => "Contact",
            RecordType::Account => "Account",
            RecordType::Lead => "Lead",
            RecordType::Opportunity => "Opportunity",
            RecordType::Case => "Case",
        }
    }

    /// Plural lowercase name.
    pub fn plural(self) -> &'static str {
        match self {
            RecordType::Contact => "contacts",
            RecordType::Account => "accounts",
            RecordType::Lead => "leads",
            RecordType::Opportunity => "opportunities",
            RecordType::Case => "cases",
        }
    }

    /// REST collection path for this record type.
    pub fn endpoint(self) -> String {
        format!("/api/{}", self.plural())
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower || t.plural() == lower)
            .ok_or_else(|| {
                InvalidInputError::RecordType {
                    value: s.to_string(),
                }
                .into()
            })
    }
}
