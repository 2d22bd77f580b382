//! The write coordinator.
//!
//! One coordinator writes to one table. A save runs
//! classify → validate → flatten → marshal → put, stopping at the first
//! failure. Whatever happened is kept as the last [`WriteAction`] until the
//! next save replaces it.

use crate::{InstanceSnapshot, WriteAction, WriteConfig, WriteError, WriteResult};
use std::sync::Arc;
use tessera_flatten::{Flattener, PrimaryKeyValidator};
use tessera_model::{FlattenedRecord, Record, Tagged};
use tessera_storage::{Item, QueryRequest, StorageClient, marshal_item, unmarshal_item};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A coordinator shared between tasks.
pub type SharedTessera = Arc<Mutex<Tessera>>;

/// Validates, flattens and stores records in a single table.
pub struct Tessera {
    client: Arc<dyn StorageClient>,
    config: WriteConfig,
    flattener: Flattener,
    validator: PrimaryKeyValidator,
    last_action: Option<WriteAction>,
}

impl Tessera {
    pub fn new(client: Arc<dyn StorageClient>, config: WriteConfig) -> Self {
        Self {
            client,
            flattener: config.flattener(),
            validator: config.validator(),
            config,
            last_action: None,
        }
    }

    /// Wraps the coordinator for use from several tasks. Saves stay
    /// serialized through the lock.
    pub fn into_shared(self) -> SharedTessera {
        Arc::new(Mutex::new(self))
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &WriteConfig {
        &self.config
    }

    /// Replaces the configuration for subsequent saves and queries.
    pub fn reconfigure(&mut self, config: WriteConfig) {
        if config.delimiter != self.config.delimiter {
            warn!(
                "Delimiter changed from {:?} to {:?}; existing composite keys will not match",
                self.config.delimiter, config.delimiter
            );
        }
        self.flattener = config.flattener();
        self.validator = config.validator();
        self.config = config;
    }

    /// Returns the most recent action, if any save has run.
    pub fn last_action(&self) -> Option<&WriteAction> {
        self.last_action.as_ref()
    }

    /// Returns the error of the most recent action.
    pub fn error(&self) -> Option<&WriteError> {
        self.last_action.as_ref().and_then(|action| action.error.as_ref())
    }

    /// Writes a map or struct record.
    ///
    /// The outcome is recorded as the last action whether or not it
    /// succeeds; on failure the same error is returned.
    pub async fn save(&mut self, input: Record) -> WriteResult<WriteAction> {
        let snapshot = InstanceSnapshot::capture(&self.config, self.client.backend_name());
        let mut action = WriteAction::begin(snapshot, input.clone());

        debug!(
            "Saving {} record to table {}",
            input.kind(),
            self.config.table
        );
        let outcome = self.write(&mut action, input).await;

        match &outcome {
            Ok(()) => info!(
                "Saved {} attributes to table {}",
                action.flattened.as_ref().map_or(0, FlattenedRecord::len),
                self.config.table
            ),
            Err(e) => {
                warn!("Save to table {} failed: {}", self.config.table, e);
                action.error = Some(e.clone());
            }
        }

        self.last_action = Some(action.clone());
        outcome.map(|()| action)
    }

    /// Converts a typed value and writes it.
    ///
    /// A value whose shape cannot be built never starts a save, so the last
    /// action is left as it was.
    pub async fn save_tagged<T: Tagged>(&mut self, value: &T) -> WriteResult<WriteAction> {
        let record = value.to_record()?;
        self.save(record).await
    }

    async fn write(&self, action: &mut WriteAction, input: Record) -> WriteResult<()> {
        let (flattened, struct_key) = match input {
            Record::Null => return Err(WriteError::NilInput),
            Record::Map(entries) => {
                self.validator.validate_map(&entries)?;
                (self.flattener.flatten_map(entries)?, None)
            }
            Record::Struct(record) => {
                self.validator.validate_struct(&record)?;
                let key = record
                    .primary_key()
                    .map(|(field, _)| field.output_key.clone());
                (self.flattener.flatten_struct(record, 0)?, key)
            }
            other => return Err(WriteError::UnsupportedType(other.kind())),
        };

        let item = self.admit(&flattened, struct_key.as_deref());
        action.flattened = Some(flattened);
        let item = item?;

        self.client.put(&self.config.table, item).await?;
        Ok(())
    }

    /// Re-checks the primary key on the flattened record, then marshals it.
    fn admit(&self, flattened: &FlattenedRecord, struct_key: Option<&str>) -> WriteResult<Item> {
        match struct_key {
            Some(key) => self.validator.validate_flat_key(flattened, key)?,
            None => self.validator.validate_flat(flattened)?,
        }
        Ok(marshal_item(flattened)?)
    }

    /// Reads items back from the configured table in flattened form.
    ///
    /// Does not touch the last-action slot.
    pub async fn query(&self, request: &QueryRequest) -> WriteResult<Vec<FlattenedRecord>> {
        let items = self.client.query(&self.config.table, request).await?;
        debug!(
            "Query on table {} returned {} items",
            self.config.table,
            items.len()
        );
        let records = items
            .into_iter()
            .map(unmarshal_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl std::fmt::Debug for Tessera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tessera")
            .field("backend", &self.client.backend_name())
            .field("config", &self.config)
            .field("last_action", &self.last_action)
            .finish_non_exhaustive()
    }
}
