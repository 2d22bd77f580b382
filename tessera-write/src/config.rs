//! Coordinator configuration.

use serde::{Deserialize, Serialize};
use tessera_flatten::{DEFAULT_DELIMITER, Flattener, NestedEntries, PrimaryKeyValidator};

/// Configuration for a [`Tessera`](crate::Tessera) coordinator.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use tessera_write::WriteConfig;
///
/// let config = WriteConfig::from_json(r#"{ "table": "people" }"#).unwrap();
/// assert_eq!(config.table, "people");
/// assert_eq!(config.primary_keys, vec!["id".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteConfig {
    /// Target table.
    pub table: String,
    /// Top-level keys every map-origin record must carry.
    pub primary_keys: Vec<String>,
    /// Character joining composite key segments.
    pub delimiter: char,
    /// Whether expanded containers stay next to their composite keys.
    pub nested_entries: NestedEntries,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            table: "tessera".to_string(),
            primary_keys: vec!["id".to_string()],
            delimiter: DEFAULT_DELIMITER,
            nested_entries: NestedEntries::Retain,
        }
    }
}

impl WriteConfig {
    /// Creates a configuration for `table` keyed by `primary_keys`.
    pub fn new<I, S>(table: impl Into<String>, primary_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            primary_keys: primary_keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_nested_entries(mut self, nested: NestedEntries) -> Self {
        self.nested_entries = nested;
        self
    }

    pub(crate) fn flattener(&self) -> Flattener {
        Flattener::new(self.delimiter).with_nested_entries(self.nested_entries)
    }

    pub(crate) fn validator(&self) -> PrimaryKeyValidator {
        PrimaryKeyValidator::new(self.primary_keys.iter().cloned())
    }
}
