#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tessera_storage::{Item, QueryRequest, StorageClient, StorageError, StorageResult};
use tessera_write::{
    Record, RecordShape, ShapeCell, ShapeError, Tagged, Tessera, WriteConfig,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Recording client
// ============================================================================

/// Storage client that remembers every put and can be told to fail.
#[derive(Default)]
pub struct RecordingClient {
    puts: Mutex<Vec<(String, Item)>>,
    failure: Mutex<Option<StorageError>>,
}

impl RecordingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_with(&self, error: StorageError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }

    pub fn last_put(&self) -> Option<(String, Item)> {
        self.puts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StorageClient for RecordingClient {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn put(&self, table: &str, item: Item) -> StorageResult<()> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        self.puts.lock().unwrap().push((table.to_string(), item));
        Ok(())
    }

    async fn query(&self, _table: &str, _request: &QueryRequest) -> StorageResult<Vec<Item>> {
        Ok(Vec::new())
    }
}

pub fn coordinator(client: &Arc<RecordingClient>) -> Tessera {
    init_tracing();
    Tessera::new(client.clone(), WriteConfig::new("people", ["id"]))
}

// ============================================================================
// Typed fixtures
// ============================================================================

pub struct Account {
    pub id: String,
    pub name: String,
}

impl Tagged for Account {
    fn shape() -> Result<Arc<RecordShape>, ShapeError> {
        static SHAPE: ShapeCell = ShapeCell::new();
        SHAPE.get_or_build(|| {
            RecordShape::builder("Account")
                .field("ID", "primarykey")
                .field("Name", "")
        })
    }

    fn values(&self) -> Vec<Record> {
        vec![self.id.as_str().into(), self.name.as_str().into()]
    }
}

/// A struct with no primary key declared.
pub struct Note {
    pub body: String,
}

impl Tagged for Note {
    fn shape() -> Result<Arc<RecordShape>, ShapeError> {
        static SHAPE: ShapeCell = ShapeCell::new();
        SHAPE.get_or_build(|| RecordShape::builder("Note").field("Body", ""))
    }

    fn values(&self) -> Vec<Record> {
        vec![self.body.as_str().into()]
    }
}

/// A struct whose shape declares two primary keys.
pub struct Broken;

impl Tagged for Broken {
    fn shape() -> Result<Arc<RecordShape>, ShapeError> {
        static SHAPE: ShapeCell = ShapeCell::new();
        SHAPE.get_or_build(|| {
            RecordShape::builder("Broken")
                .field("A", "primarykey")
                .field("B", "primarykey")
        })
    }

    fn values(&self) -> Vec<Record> {
        vec![Record::from("a"), Record::from("b")]
    }
}
