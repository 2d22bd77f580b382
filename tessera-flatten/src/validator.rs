//! Primary-key gate.
//!
//! Runs before anything is handed to storage. Map-origin records are checked
//! by exact top-level key presence; struct-origin records by the field their
//! shape designates as primary key, which must also hold a non-empty value.
//! Both are checked again after flattening, since an expanded container can
//! be dropped from the output.

use crate::MissingPrimaryKey;
use std::collections::BTreeMap;
use tessera_model::{FlattenedRecord, Record, StructRecord};

/// Checks declared key names against incoming records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryKeyValidator {
    required: Vec<String>,
}

impl PrimaryKeyValidator {
    /// Creates a validator for the given declared key names.
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the declared key names.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Map origin: every declared key must be an exact top-level entry.
    /// Composite keys never satisfy a requirement.
    pub fn validate_map(&self, entries: &BTreeMap<String, Record>) -> Result<(), MissingPrimaryKey> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|key| !entries.contains_key(key.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(self.error(missing))
        }
    }

    /// Same check as [`validate_map`](Self::validate_map), over a flattened
    /// record.
    pub fn validate_flat(&self, flat: &FlattenedRecord) -> Result<(), MissingPrimaryKey> {
        self.validate_map(flat.as_map())
    }

    /// Struct origin, after flattening: the primary-key field's output key
    /// must still be a top-level entry.
    pub fn validate_flat_key(&self, flat: &FlattenedRecord, key: &str) -> Result<(), MissingPrimaryKey> {
        if flat.contains_key(key) {
            Ok(())
        } else {
            Err(self.error(vec![key.to_string()]))
        }
    }

    /// Struct origin: the shape must designate a primary-key field and that
    /// field must hold a non-empty value.
    pub fn validate_struct(&self, record: &StructRecord) -> Result<(), MissingPrimaryKey> {
        match record.primary_key() {
            None => Err(self.error(self.required.clone())),
            Some((field, value)) if value.is_empty_value() => {
                Err(self.error(vec![field.output_key.clone()]))
            }
            Some(_) => Ok(()),
        }
    }

    fn error(&self, missing: Vec<String>) -> MissingPrimaryKey {
        MissingPrimaryKey {
            required: self.required.clone(),
            missing,
        }
    }
}
