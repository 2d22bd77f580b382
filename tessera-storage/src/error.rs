//! Error types for the storage seam.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for wire conversions.
pub type MarshalResult<T> = Result<T, MarshalError>;

/// Failures reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Network error reaching the backend.
    #[error("network error: {0}")]
    Network(String),

    /// Backend rejected the request due to throughput limits.
    #[error("request throttled: {0}")]
    Throttled(String),

    /// A conditional write failed its check.
    #[error("conditional check failed: {0}")]
    ConditionalCheckFailed(String),

    /// Target table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Request was malformed for this table.
    #[error("validation error: {0}")]
    Validation(String),

    /// Backend does not support the requested feature.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Item or condition value could not be converted.
    #[error("marshal error: {0}")]
    Marshal(#[from] MarshalError),
}

/// A record that cannot be expressed in, or read back from, wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    /// Top-level attribute names may not be empty.
    #[error("empty attribute name")]
    EmptyAttributeName,

    /// NaN and infinities have no wire representation.
    #[error("non-finite number in attribute {attribute}")]
    NonFiniteNumber { attribute: String },

    /// A wire number that doesn't parse.
    #[error("invalid number {value:?} in attribute {attribute}")]
    InvalidNumber { attribute: String, value: String },
}
