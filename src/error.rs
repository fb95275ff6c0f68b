//! Error types for the people lookup server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! Transport errors are absorbed by the search client's host loop and only
//! surface as an envelope message; callers of `search` never see them.

use crate::domain::ValidationErrorKind;
use thiserror::Error;

/// Errors from a single attempt against one lookup host.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Connection refused, DNS failure, reset, etc.
    #[error("Network error: {0}")]
    Network(String),

    /// No response before the request deadline
    #[error("Request timeout")]
    Timeout,

    /// Host answered with a non-2xx status
    #[error("Bad status {status} from {url}")]
    BadStatus { status: u16, url: String },

    /// Body was not the JSON we expected
    #[error("JSON parse error: {0}")]
    Decode(String),
}

impl LookupError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LookupError::Timeout)
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Failed to load .env file
    #[error("Failed to load .env file: {0}")]
    DotenvError(String),
}

/// Errors building a people or address query from form input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please enter at least a first or last name")]
    MissingName,

    #[error("Please enter street address, city, and state")]
    MissingAddressFields,

    #[error("Invalid search path: {0}")]
    BadSegment(String),
}

/// Input rejected before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{message}")]
    InvalidPhone {
        kind: ValidationErrorKind,
        message: String,
    },

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Convenience type alias for Results with LookupError
pub type LookupResult<T> = Result<T, LookupError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
