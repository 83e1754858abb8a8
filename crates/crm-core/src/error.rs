//! Error types for the CRM client.
//!
//! A single [`Error`] type with explicit variants for transport, remote,
//! authentication, filter validation and application-level failures.

use std::fmt;
use thiserror::Error;

use crate::filter::Operator;

/// The unified error type for CRM client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing or rejected token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-2xx responses from the backend.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Malformed input (URL, record id, record type).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A filter row that does not fit the field catalog.
    #[error("invalid filter: {0}")]
    Validation(#[from] ValidationError),

    /// A user action that cannot proceed in the current state.
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Static configuration that names something unknown.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl Error {
    /// True when the backend rejected the stored token (or there is none),
    /// so the user has to log in again.
    pub fn is_session_expired(&self) -> bool {
        match self {
            Error::Auth(AuthError::SessionExpired) => true,
            Error::Protocol(p) => p.is_auth_error(),
            _ => false,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The response body could not be decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The bearer token is missing, expired or revoked.
    #[error("session expired")]
    SessionExpired,
}

/// A non-2xx response from the backend.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// The `detail` message from the response body, if present.
    pub detail: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref detail) = self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, detail: Option<String>) -> Self {
        Self { status, detail }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
    }

    /// Check if the record was not found.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Unknown record type name.
    #[error("unknown record type '{value}'")]
    RecordType { value: String },

    /// Invalid record identifier.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Unknown filter operator name.
    #[error("unknown operator '{value}'")]
    Operator { value: String },

    /// Unknown row density name.
    #[error("unknown density '{value}'")]
    Density { value: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Reasons a filter row is rejected by its field catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The field key is not in the record type's catalog.
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    /// The operator is not legal for the field's value type.
    #[error("operator '{operator}' is not allowed on field '{field}'")]
    IllegalOperator { field: String, operator: Operator },

    /// A comparison operator was given an empty value.
    #[error("operator '{operator}' on field '{field}' needs a value")]
    MissingValue { field: String, operator: Operator },
}

/// Errors raised before an action is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// A bulk action was requested with nothing selected.
    #[error("select at least one record before running '{action}'")]
    EmptySelection { action: String },
}

/// Errors in static catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A field declared a value type the filter model does not know.
    #[error("unknown value type '{value}'")]
    UnknownValueType { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display_includes_detail() {
        let err = ProtocolError::new(404, Some("Lead not found".to_string()));
        assert_eq!(err.to_string(), "HTTP 404: Lead not found");
        assert!(err.is_not_found());
        assert!(!err.is_auth_error());
    }

    #[test]
    fn session_expiry_classification() {
        let err: Error = ProtocolError::new(401, None).into();
        assert!(err.is_session_expired());
        assert!(Error::from(AuthError::SessionExpired).is_session_expired());

        assert!(!Error::from(ProtocolError::new(500, None)).is_session_expired());
        assert!(!Error::from(AuthError::InvalidCredentials).is_session_expired());
    }
}
