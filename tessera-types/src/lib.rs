//! Field tags and record shape descriptors for Tessera.
//!
//! This crate defines the declarative metadata layer the flattener works from:
//! - [`FieldTag`]: per-field annotations (primary key, exclusion, rename)
//! - [`FieldDescriptor`]: a resolved field: name, output key, visibility, tag
//! - [`RecordShape`]: the descriptor table for one struct-like record type
//!
//! Shapes are built once per type and shared; nothing here inspects values.

mod shape;
mod tag;

pub use shape::{FieldDescriptor, RecordShape, RecordShapeBuilder, Visibility};
pub use tag::FieldTag;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, ShapeError>;

/// Errors raised while building a [`RecordShape`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("shape {shape} declares more than one primary key: {first}, {second}")]
    DuplicatePrimaryKey {
        shape: String,
        first: String,
        second: String,
    },

    #[error("shape {shape} declares field {field} twice")]
    DuplicateField { shape: String, field: String },

    #[error("shape {shape} has a field with an empty name")]
    EmptyFieldName { shape: String },
}
