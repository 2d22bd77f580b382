//! Record model for Tessera.
//!
//! Defines the values that flow through the write path:
//! - [`Record`]: closed variant over nulls, scalars, collections, maps and structs
//! - [`StructRecord`]: field values paired with a shared [`RecordShape`]
//! - [`Tagged`]: implemented by Rust types that write as struct records
//! - [`FlattenedRecord`]: the single-level form handed to storage
//!
//! Anything that is not one of these variants cannot be written, so there is
//! no runtime "unsupported kind" case to handle downstream.
//!
//! [`RecordShape`]: tessera_types::RecordShape

mod flat;
mod record;
mod structs;

pub use flat::FlattenedRecord;
pub use record::{Record, RecordKind, Scalar};
pub use structs::{ShapeCell, StructRecord, Tagged};

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while assembling records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The shape descriptor itself is malformed.
    #[error("invalid shape: {0}")]
    Shape(#[from] tessera_types::ShapeError),

    /// A struct record was given the wrong number of field values.
    #[error("shape {shape} declares {expected} fields but {actual} values were given")]
    ArityMismatch {
        shape: String,
        expected: usize,
        actual: usize,
    },

    /// An integer does not fit the normalized 64-bit representation.
    #[error("integer {0} does not fit in i64")]
    IntegerOverflow(String),
}
