//! The flattening engine.
//!
//! Containers are expanded breadth-first from an explicit queue. A map's
//! children land under `prefix + DELIM + key`. A nested struct's visible
//! fields land under `TypeName + DELIM + output_key`, merged at the top level
//! next to everything else, so two nested structs of the same type with
//! different field values collide. A child that is itself a container is
//! queued in turn. The loop stops when the queue is empty, which is exactly
//! the point where another pass over the output would introduce no new keys.
//!
//! Containers themselves are kept verbatim under their own key. Private and
//! excluded struct fields never get a key of their own.

use crate::{FlattenError, FlattenResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tessera_model::{FlattenedRecord, Record, StructRecord};

/// Delimiter joining composite key segments unless configured otherwise.
///
/// It is embedded in every stored key name: changing it breaks reads of data
/// written with the old one.
pub const DEFAULT_DELIMITER: char = '#';

/// What happens to a container once its children have been expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedEntries {
    /// Keep the container under its own key next to the synthesized keys.
    #[default]
    Retain,
    /// Drop expanded containers, leaving only leaves. Empty containers stay.
    Replace,
}

/// Flattens nested records into composite-keyed single-level records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flattener {
    delimiter: char,
    nested: NestedEntries,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl Flattener {
    /// Creates a flattener joining segments with `delimiter`.
    #[must_use]
    pub const fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            nested: NestedEntries::Retain,
        }
    }

    /// Sets what happens to expanded containers.
    #[must_use]
    pub const fn with_nested_entries(mut self, nested: NestedEntries) -> Self {
        self.nested = nested;
        self
    }

    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    #[must_use]
    pub const fn nested_entries(&self) -> NestedEntries {
        self.nested
    }

    /// Flattens a record at depth 0.
    pub fn flatten(&self, record: Record) -> FlattenResult<Record> {
        self.flatten_at(record, 0)
    }

    /// Flattens a record reached at `depth`.
    ///
    /// Maps and structs come back as a map of composite keys; anything else
    /// is already flat and is returned unchanged. `depth` only matters for a
    /// struct: at depth 0 its fields are keyed by output key alone, deeper
    /// they are namespaced by the struct's type name.
    pub fn flatten_at(&self, record: Record, depth: usize) -> FlattenResult<Record> {
        match record {
            Record::Map(entries) => self.flatten_map(entries).map(Record::from),
            Record::Struct(record) => self.flatten_struct(record, depth).map(Record::from),
            other => Ok(other),
        }
    }

    /// Flattens map entries. Every original entry is kept verbatim (or
    /// dropped, in [`NestedEntries::Replace`] mode, if it was expanded).
    pub fn flatten_map(&self, entries: BTreeMap<String, Record>) -> FlattenResult<FlattenedRecord> {
        self.expand(entries.into_iter().collect())
    }

    /// Flattens a struct's visible fields.
    pub fn flatten_struct(
        &self,
        record: StructRecord,
        depth: usize,
    ) -> FlattenResult<FlattenedRecord> {
        if depth == 0 {
            let seed = record
                .into_visible_entries()
                .map(|(field, value)| (field.output_key, value))
                .collect();
            self.expand(seed)
        } else {
            let mut pending = VecDeque::new();
            pending.push_back(Pending::Struct(None, record));
            self.drain(FlattenedRecord::new(), pending)
        }
    }

    fn compose(&self, prefix: &str, key: &str) -> String {
        let mut composed = String::with_capacity(prefix.len() + key.len() + 1);
        composed.push_str(prefix);
        composed.push(self.delimiter);
        composed.push_str(key);
        composed
    }

    fn expand(&self, seed: Vec<(String, Record)>) -> FlattenResult<FlattenedRecord> {
        let mut out = FlattenedRecord::new();
        let mut pending = VecDeque::new();
        for (key, value) in seed {
            place(&mut out, &mut pending, key, value)?;
        }
        self.drain(out, pending)
    }

    fn drain(
        &self,
        mut out: FlattenedRecord,
        mut pending: VecDeque<Pending>,
    ) -> FlattenResult<FlattenedRecord> {
        let mut expanded: BTreeSet<String> = BTreeSet::new();

        while let Some(next) = pending.pop_front() {
            match next {
                Pending::Map(prefix, children) => {
                    for (key, value) in children {
                        let key = self.compose(&prefix, &key);
                        place(&mut out, &mut pending, key, value)?;
                    }
                    expanded.insert(prefix);
                }
                Pending::Struct(placed_at, record) => {
                    let type_name = record.type_name().to_string();
                    for (field, value) in record.into_visible_entries() {
                        let key = self.compose(&type_name, &field.output_key);
                        place(&mut out, &mut pending, key, value)?;
                    }
                    expanded.extend(placed_at);
                }
            }
        }

        if self.nested == NestedEntries::Replace {
            for key in &expanded {
                out.remove(key);
            }
        }

        Ok(out)
    }
}

/// A container waiting to be expanded.
enum Pending {
    /// Map children, keyed under the prefix.
    Map(String, BTreeMap<String, Record>),
    /// Struct fields, keyed under `TypeName + DELIM + output_key`. Carries the
    /// key the struct itself was placed under, if any.
    Struct(Option<String>, StructRecord),
}

/// Inserts one entry verbatim, queueing it for expansion if it is a non-empty
/// map or a struct with visible fields.
fn place(
    out: &mut FlattenedRecord,
    pending: &mut VecDeque<Pending>,
    key: String,
    value: Record,
) -> FlattenResult<()> {
    match value {
        Record::Map(children) if !children.is_empty() => {
            if insert_unique(out, key.clone(), Record::Map(children.clone()))? {
                pending.push_back(Pending::Map(key, children));
            }
            Ok(())
        }
        Record::Struct(record) if record.visible_entries().next().is_some() => {
            if insert_unique(out, key.clone(), Record::Struct(record.clone()))? {
                pending.push_back(Pending::Struct(Some(key), record));
            }
            Ok(())
        }
        other => insert_unique(out, key, other).map(|_| ()),
    }
}

/// Inserts `value` under `key`. Re-inserting an equal value is a no-op and
/// returns `false`; a different value is a collision.
fn insert_unique(out: &mut FlattenedRecord, key: String, value: Record) -> FlattenResult<bool> {
    match out.get(&key) {
        Some(existing) if *existing == value => Ok(false),
        Some(_) => Err(FlattenError::KeyCollision { key }),
        None => {
            out.insert(key, value);
            Ok(true)
        }
    }
}
