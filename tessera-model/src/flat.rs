use crate::Record;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// A single-level mapping from composite key to value.
///
/// Values may still be maps, structs or collections: containers the flattener
/// retained next to their expanded children, and collections, which are never
/// decomposed. Keys iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedRecord {
    entries: BTreeMap<String, Record>,
}

impl FlattenedRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.entries.get(key)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: Record) -> Option<Record> {
        self.entries.insert(key.into(), value)
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Record> {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Record> {
        self.entries.iter()
    }

    /// Borrows the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, Record> {
        &self.entries
    }

    /// Consumes the record, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Record> {
        self.entries
    }
}

impl From<BTreeMap<String, Record>> for FlattenedRecord {
    fn from(entries: BTreeMap<String, Record>) -> Self {
        Self { entries }
    }
}

impl From<FlattenedRecord> for Record {
    fn from(value: FlattenedRecord) -> Self {
        Self::Map(value.entries)
    }
}

impl FromIterator<(String, Record)> for FlattenedRecord {
    fn from_iter<I: IntoIterator<Item = (String, Record)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FlattenedRecord {
    type Item = (String, Record);
    type IntoIter = btree_map::IntoIter<String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlattenedRecord {
    type Item = (&'a String, &'a Record);
    type IntoIter = btree_map::Iter<'a, String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
