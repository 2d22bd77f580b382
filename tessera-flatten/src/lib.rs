//! Record flattening and primary-key validation for Tessera.
//!
//! [`Flattener`] reduces a nested [`Record`] to a single level of composite
//! keys joined by a delimiter:
//!
//! ```text
//! {"u": {"m": {"l": "v"}}}  →  {"u": {..}, "u#m": {..}, "u#m#l": "v"}
//! ```
//!
//! Expansion runs over an explicit work queue until no pending container is
//! left, so the output is a fixed point: flattening it again adds nothing.
//! [`PrimaryKeyValidator`] is the gate the write path runs before anything
//! is sent to storage.
//!
//! [`Record`]: tessera_model::Record

mod error;
mod flattener;
mod validator;

pub use error::{FlattenError, FlattenResult, MissingPrimaryKey};
pub use flattener::{DEFAULT_DELIMITER, Flattener, NestedEntries};
pub use validator::PrimaryKeyValidator;
