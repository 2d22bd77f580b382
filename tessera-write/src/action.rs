use crate::{WriteConfig, WriteError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_model::{FlattenedRecord, Record};

/// Coordinator state captured when a save begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    pub table: String,
    pub primary_keys: Vec<String>,
    pub delimiter: char,
    /// Name of the storage backend the save was sent to.
    pub backend: String,
    pub captured_at: DateTime<Utc>,
}

impl InstanceSnapshot {
    pub(crate) fn capture(config: &WriteConfig, backend: &str) -> Self {
        Self {
            table: config.table.clone(),
            primary_keys: config.primary_keys.clone(),
            delimiter: config.delimiter,
            backend: backend.to_string(),
            captured_at: Utc::now(),
        }
    }
}

/// Record of the most recent save.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteAction {
    /// The record as it was handed to `save`.
    pub raw_input: Record,
    /// The flattened form, once flattening succeeded.
    pub flattened: Option<FlattenedRecord>,
    pub executed_at: DateTime<Utc>,
    pub snapshot: InstanceSnapshot,
    /// Why the save failed, if it did.
    pub error: Option<WriteError>,
}

impl WriteAction {
    pub(crate) fn begin(snapshot: InstanceSnapshot, raw_input: Record) -> Self {
        Self {
            raw_input,
            flattened: None,
            executed_at: Utc::now(),
            snapshot,
            error: None,
        }
    }

    /// Returns true if the save reached storage and was accepted.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}
