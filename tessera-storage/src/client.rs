//! Storage client abstraction trait.
//!
//! Defines the interface a key-value backend exposes to the write path.

use crate::{Item, StorageError, StorageResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tessera_model::Record;

/// Comparison applied by a key condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    BeginsWith,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::BeginsWith => "begins_with",
        };
        f.write_str(symbol)
    }
}

impl FromStr for ComparisonOp {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" => Ok(Self::Eq),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            op if op.eq_ignore_ascii_case("begins_with") => Ok(Self::BeginsWith),
            other => Err(StorageError::Validation(format!(
                "unknown comparison operator: {other}"
            ))),
        }
    }
}

/// `attribute <op> value` over a key attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    pub attribute: String,
    pub operator: ComparisonOp,
    pub value: Record,
}

impl KeyCondition {
    pub fn new(
        attribute: impl Into<String>,
        operator: ComparisonOp,
        value: impl Into<Record>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            value: value.into(),
        }
    }

    /// Shorthand for an equality condition.
    pub fn equals(attribute: impl Into<String>, value: impl Into<Record>) -> Self {
        Self::new(attribute, ComparisonOp::Eq, value)
    }
}

/// A key-conditioned read.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Condition on the partition key. Backends generally require equality.
    pub partition: KeyCondition,
    /// Optional condition on the sort key.
    pub sort: Option<KeyCondition>,
    /// Backend-specific filter applied after the key conditions.
    pub filter_expression: Option<String>,
    /// Maximum number of items *read*, before any filter is applied.
    pub limit: Option<u32>,
}

impl QueryRequest {
    /// Creates a query for all items under one partition key value.
    pub fn partition(attribute: impl Into<String>, value: impl Into<Record>) -> Self {
        Self {
            partition: KeyCondition::equals(attribute, value),
            sort: None,
            filter_expression: None,
            limit: None,
        }
    }

    /// Adds a sort key condition.
    #[must_use]
    pub fn with_sort(mut self, condition: KeyCondition) -> Self {
        self.sort = Some(condition);
        self
    }

    /// Adds a backend filter expression.
    #[must_use]
    pub fn with_filter(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    /// Bounds the number of items read.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Abstract key-value store interface.
///
/// Implementations own their session, retries and wire protocol; callers
/// see one blocking-with-error-return call per operation.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Returns the name of the backend.
    fn backend_name(&self) -> &'static str;

    /// Unconditionally writes one item, replacing any item with the same key.
    async fn put(&self, table: &str, item: Item) -> StorageResult<()>;

    /// Reads items matching the request's key conditions.
    async fn query(&self, table: &str, request: &QueryRequest) -> StorageResult<Vec<Item>>;
}
