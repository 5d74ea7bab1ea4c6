//! Error types for panelorm

use thiserror::Error;

/// Result type alias for panelorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for builder and execution failures.
///
/// Every variant is plain data so errors recorded mid-chain can be cloned and
/// surfaced again at `get()` time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrmError {
    /// Field map or table configuration is unusable (empty map, missing "id",
    /// invalid identifier). Raised eagerly at construction.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A payload key has no entry in the field map.
    #[error("Unknown field '{field}' for table '{table}'")]
    UnknownField { table: String, field: String },

    /// update/delete/find was invoked without an id in the payload.
    #[error("{0} requires an id")]
    MissingIdentifier(String),

    /// get() was called with no recorded operation, or a finisher was asked
    /// for a result shape the recorded operation cannot produce.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// The underlying execution primitive reported a failure.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Result column could not be represented as a [`Value`](crate::Value).
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Builder misuse detected while assembling a statement (empty payload,
    /// refinement on a non-query chain).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl OrmError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an unknown-field error
    pub fn unknown_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Create a missing-identifier error for the named operation
    pub fn missing_identifier(operation: impl Into<String>) -> Self {
        Self::MissingIdentifier(operation.into())
    }

    /// Create a dispatch error
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a missing-identifier error
    pub fn is_missing_identifier(&self) -> bool {
        matches!(self, Self::MissingIdentifier(_))
    }

    /// Check if this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}
