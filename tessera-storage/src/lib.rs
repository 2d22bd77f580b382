//! Storage seam for Tessera.
//!
//! The remote key-value store is a collaborator: this crate only defines how
//! the write path talks to it.
//!
//! # Architecture
//!
//! - [`StorageClient`] is the async `put`/`query` interface a backend implements
//! - [`AttributeValue`] / [`Item`] are the wire form items travel in
//! - [`marshal_item`] / [`unmarshal_item`] convert between flattened records and items
//! - [`MemoryStore`] is an in-process backend for tests and local runs

mod client;
mod error;
mod marshal;
mod memory;
mod wire;

pub use client::{ComparisonOp, KeyCondition, QueryRequest, StorageClient};
pub use error::{MarshalError, MarshalResult, StorageError, StorageResult};
pub use marshal::{marshal, marshal_item, unmarshal, unmarshal_item};
pub use memory::{KeySchema, MemoryStore};
pub use wire::{AttributeValue, Item};
