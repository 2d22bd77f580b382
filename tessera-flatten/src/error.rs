//! Error types for flattening and validation.

use thiserror::Error;

/// Result type for flattening operations.
pub type FlattenResult<T> = Result<T, FlattenError>;

/// Errors that can occur while flattening.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    /// Two distinct paths produced the same composite key with different
    /// values.
    #[error("composite key collision: {key}")]
    KeyCollision { key: String },
}

/// Declared key(s) absent or empty.
///
/// Carries the full declared key set, not just the missing names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required table keys missing: {required:?} (absent or empty: {missing:?})")]
pub struct MissingPrimaryKey {
    pub required: Vec<String>,
    pub missing: Vec<String>,
}
