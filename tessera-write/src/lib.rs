//! Tessera: flatten nested records into a schema-less key-value table.
//!
//! [`Tessera`] is the entry point. It takes a map or struct [`Record`],
//! checks the declared primary keys, flattens it into composite keys,
//! marshals it into wire form and hands it to a [`StorageClient`]:
//!
//! ```text
//! {"id": "u1", "address": {"city": "Oslo"}}
//!   → {"id": "u1", "address": {..}, "address#city": "Oslo"}
//!   → put(table, item)
//! ```
//!
//! The coordinator keeps the most recent [`WriteAction`] for inspection.
//! This crate re-exports the types a caller needs from the other Tessera
//! crates.

mod action;
mod config;
mod coordinator;
mod error;

pub use action::{InstanceSnapshot, WriteAction};
pub use config::WriteConfig;
pub use coordinator::{SharedTessera, Tessera};
pub use error::{WriteError, WriteResult};

pub use tessera_flatten::{FlattenError, MissingPrimaryKey, NestedEntries};
pub use tessera_model::{
    FlattenedRecord, ModelError, Record, RecordKind, Scalar, ShapeCell, StructRecord, Tagged,
};
pub use tessera_storage::{
    ComparisonOp, KeyCondition, KeySchema, MemoryStore, QueryRequest, StorageClient, StorageError,
};
pub use tessera_types::{RecordShape, RecordShapeBuilder, ShapeError};
