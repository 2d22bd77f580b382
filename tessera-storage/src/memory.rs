//! In-process storage backend.
//!
//! Keeps tables of items in memory, keyed by their partition (and optional
//! sort) attribute. Behaves like a remote key-value store for everything the
//! write path relies on: puts replace by key, queries need an equality
//! condition on the partition key and return items ordered by sort key.
//! Filter expressions are not evaluated.

use crate::{
    AttributeValue, ComparisonOp, Item, QueryRequest, StorageClient, StorageError, StorageResult,
    marshal,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Key attributes of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    pub partition_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl KeySchema {
    /// A schema keyed by partition attribute only.
    pub fn partition(name: impl Into<String>) -> Self {
        Self {
            partition_key: name.into(),
            sort_key: None,
        }
    }

    /// Adds a sort key attribute.
    #[must_use]
    pub fn with_sort(mut self, name: impl Into<String>) -> Self {
        self.sort_key = Some(name.into());
        self
    }
}

/// Key attribute value as used for item identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum KeyPart {
    S(String),
    N(String),
    B(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct StoredKey {
    partition: KeyPart,
    sort: Option<KeyPart>,
}

#[derive(Debug)]
struct Table {
    schema: KeySchema,
    items: BTreeMap<StoredKey, Item>,
}

impl Table {
    fn key_of(&self, item: &Item) -> StorageResult<StoredKey> {
        let partition = key_part(&self.schema.partition_key, item)?;
        let sort = match &self.schema.sort_key {
            Some(name) => Some(key_part(name, item)?),
            None => None,
        };
        Ok(StoredKey { partition, sort })
    }
}

fn key_part(name: &str, item: &Item) -> StorageResult<KeyPart> {
    match item.get(name) {
        Some(AttributeValue::S(s)) if !s.is_empty() => Ok(KeyPart::S(s.clone())),
        Some(AttributeValue::N(n)) => canonical_number(name, n).map(KeyPart::N),
        Some(AttributeValue::B(b)) if !b.is_empty() => Ok(KeyPart::B(b.clone())),
        Some(other) => Err(StorageError::Validation(format!(
            "key attribute {name} must be a non-empty S, N or B, got {}",
            other.type_name()
        ))),
        None => Err(StorageError::Validation(format!(
            "item is missing key attribute {name}"
        ))),
    }
}

/// Spells a number key so that numerically equal values share one identity
/// (`1`, `1.0` and `+1` are the same key).
fn canonical_number(name: &str, n: &str) -> StorageResult<String> {
    if let Ok(int) = n.parse::<i64>() {
        return Ok(int.to_string());
    }
    match n.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation)]
        Ok(f) if f.fract() == 0.0 && f.abs() < 9.0e18 => Ok((f as i64).to_string()),
        Ok(f) if f.is_finite() => Ok(f.to_string()),
        _ => Err(StorageError::Validation(format!(
            "key attribute {name} is not a finite number: {n}"
        ))),
    }
}

/// In-memory [`StorageClient`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    /// Creates a store with no tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with a single table.
    #[must_use]
    pub fn with_table(name: impl Into<String>, schema: KeySchema) -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            name.into(),
            Table {
                schema,
                items: BTreeMap::new(),
            },
        );
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Creates a table, replacing any existing table of the same name.
    pub async fn create_table(&self, name: impl Into<String>, schema: KeySchema) {
        let name = name.into();
        let mut tables = self.tables.write().await;
        if tables.contains_key(&name) {
            warn!("Replacing existing in-memory table {}", name);
        }
        tables.insert(
            name,
            Table {
                schema,
                items: BTreeMap::new(),
            },
        );
    }

    /// Returns the number of items in a table, or `None` if it doesn't exist.
    pub async fn item_count(&self, table: &str) -> Option<usize> {
        self.tables.read().await.get(table).map(|t| t.items.len())
    }

    /// Returns every item of a table in key order.
    pub async fn scan(&self, table: &str) -> StorageResult<Vec<Item>> {
        let tables = self.tables.read().await;
        let table = tables
            .get(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;
        Ok(table.items.values().cloned().collect())
    }
}

#[async_trait]
impl StorageClient for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, table: &str, item: Item) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        let state = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;

        let key = state.key_of(&item)?;
        debug!("Put item with {} attributes into {}", item.len(), table);
        state.items.insert(key, item);
        Ok(())
    }

    async fn query(&self, table: &str, request: &QueryRequest) -> StorageResult<Vec<Item>> {
        if let Some(expression) = &request.filter_expression {
            return Err(StorageError::Unsupported(format!(
                "filter expression {expression:?} on in-memory backend"
            )));
        }

        let tables = self.tables.read().await;
        let state = tables
            .get(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;

        let partition = &request.partition;
        if partition.attribute != state.schema.partition_key {
            return Err(StorageError::Validation(format!(
                "{} is not the partition key of {}",
                partition.attribute, table
            )));
        }
        if partition.operator != ComparisonOp::Eq {
            return Err(StorageError::Validation(format!(
                "partition key condition must use =, got {}",
                partition.operator
            )));
        }
        let partition_value = marshal(&partition.value)?;

        let sort = match &request.sort {
            Some(condition) => {
                if state.schema.sort_key.as_deref() != Some(condition.attribute.as_str()) {
                    return Err(StorageError::Validation(format!(
                        "{} is not the sort key of {}",
                        condition.attribute, table
                    )));
                }
                Some((
                    condition.attribute.as_str(),
                    condition.operator,
                    marshal(&condition.value)?,
                ))
            }
            None => None,
        };

        let mut matched: Vec<&Item> = state
            .items
            .values()
            .filter(|item| {
                item.get(&partition.attribute)
                    .is_some_and(|v| satisfies(ComparisonOp::Eq, v, &partition_value))
            })
            .filter(|item| match &sort {
                Some((attribute, op, expected)) => item
                    .get(*attribute)
                    .is_some_and(|v| satisfies(*op, v, expected)),
                None => true,
            })
            .collect();

        if let Some(sort_key) = &state.schema.sort_key {
            matched.sort_by(|a, b| match (a.get(sort_key), b.get(sort_key)) {
                (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            });
        }

        let limit = request.limit.map_or(usize::MAX, |n| n as usize);
        let items: Vec<Item> = matched.into_iter().take(limit).cloned().collect();
        debug!("Query on {} returned {} items", table, items.len());
        Ok(items)
    }
}

/// Orders two wire values of the same scalar type. Numbers compare
/// numerically.
fn compare(a: &AttributeValue, b: &AttributeValue) -> Option<Ordering> {
    match (a, b) {
        (AttributeValue::S(x), AttributeValue::S(y)) => Some(x.cmp(y)),
        (AttributeValue::B(x), AttributeValue::B(y)) => Some(x.cmp(y)),
        (AttributeValue::N(x), AttributeValue::N(y)) => {
            let x: f64 = x.parse().ok()?;
            let y: f64 = y.parse().ok()?;
            x.partial_cmp(&y)
        }
        _ => None,
    }
}

fn satisfies(op: ComparisonOp, actual: &AttributeValue, expected: &AttributeValue) -> bool {
    if op == ComparisonOp::BeginsWith {
        return match (actual, expected) {
            (AttributeValue::S(a), AttributeValue::S(e)) => a.starts_with(e.as_str()),
            (AttributeValue::B(a), AttributeValue::B(e)) => a.starts_with(e),
            _ => false,
        };
    }

    let Some(ordering) = compare(actual, expected) else {
        return false;
    };
    match op {
        ComparisonOp::Eq => ordering == Ordering::Equal,
        ComparisonOp::Lt => ordering == Ordering::Less,
        ComparisonOp::Le => ordering != Ordering::Greater,
        ComparisonOp::Gt => ordering == Ordering::Greater,
        ComparisonOp::Ge => ordering != Ordering::Less,
        ComparisonOp::BeginsWith => false,
    }
}
