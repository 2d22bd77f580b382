//! Error types for the write path.

use tessera_flatten::{FlattenError, MissingPrimaryKey};
use tessera_model::{ModelError, RecordKind};
use tessera_storage::{MarshalError, StorageError};
use thiserror::Error;

/// Result type for coordinator operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Errors that can end a save or query.
///
/// Cloneable so the same error can be both returned and kept in the
/// coordinator's last-action slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The input was `Record::Null`.
    #[error("provided input nil")]
    NilInput,

    /// The outermost input was neither a map nor a struct.
    #[error("unacceptable input type: {0}")]
    UnsupportedType(RecordKind),

    /// Declared key(s) absent or empty.
    #[error(transparent)]
    MissingPrimaryKey(#[from] MissingPrimaryKey),

    /// Flattening failed.
    #[error("flatten error: {0}")]
    Flatten(#[from] FlattenError),

    /// A typed value could not be turned into a record.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// The flattened record has no wire form.
    #[error("marshal error: {0}")]
    Marshal(#[from] MarshalError),

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
