//! The closed record variant.

use crate::{ModelError, StructRecord};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A leaf value that is never decomposed.
///
/// Every integer width is normalized to `i64` on the way in, so storage never
/// sees mixed widths for the same attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Binary(Vec<u8>),
}

/// An in-memory record of arbitrary nesting.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Absence of a value.
    Null,
    Scalar(Scalar),
    /// Ordered sequence. Collections are leaves: they are never flattened.
    Collection(Vec<Record>),
    /// String-keyed mapping. Iteration order is the key order.
    Map(BTreeMap<String, Record>),
    Struct(StructRecord),
}

/// The observed shape of a record, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Null,
    String,
    Int,
    Float,
    Bool,
    Timestamp,
    Binary,
    Collection,
    Map,
    Struct,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Timestamp => "timestamp",
            Self::Binary => "binary",
            Self::Collection => "collection",
            Self::Map => "map",
            Self::Struct => "struct",
        };
        f.write_str(name)
    }
}

impl Record {
    /// Builds a map record from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Record>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a binary leaf.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Scalar(Scalar::Binary(bytes.into()))
    }

    /// Builds an integer leaf from an unsigned 64-bit value, failing if it
    /// does not fit the normalized representation.
    pub fn try_from_u64(value: u64) -> Result<Self, ModelError> {
        Self::try_from(value)
    }

    /// Returns the observed kind of this record.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Null => RecordKind::Null,
            Self::Scalar(Scalar::String(_)) => RecordKind::String,
            Self::Scalar(Scalar::Int(_)) => RecordKind::Int,
            Self::Scalar(Scalar::Float(_)) => RecordKind::Float,
            Self::Scalar(Scalar::Bool(_)) => RecordKind::Bool,
            Self::Scalar(Scalar::Timestamp(_)) => RecordKind::Timestamp,
            Self::Scalar(Scalar::Binary(_)) => RecordKind::Binary,
            Self::Collection(_) => RecordKind::Collection,
            Self::Map(_) => RecordKind::Map,
            Self::Struct(_) => RecordKind::Struct,
        }
    }

    /// Returns true for map and struct records, the only kinds the flattener
    /// expands.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Map(_) | Self::Struct(_))
    }

    /// Returns true if the value carries nothing usable as a key.
    ///
    /// Numbers and booleans are never empty; strings, binaries, collections
    /// and maps are empty when they have no content, structs when they have
    /// no visible fields.
    #[must_use]
    pub fn is_empty_value(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Scalar(Scalar::String(s)) => s.is_empty(),
            Self::Scalar(Scalar::Binary(b)) => b.is_empty(),
            Self::Scalar(_) => false,
            Self::Collection(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            Self::Struct(record) => record.visible_entries().next().is_none(),
        }
    }

    /// Returns the string value, if this is a string leaf.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer leaf.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Returns the map entries, if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Record>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<Scalar> for Record {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<String> for Record {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<&str> for Record {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<bool> for Record {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<f64> for Record {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

impl From<f32> for Record {
    fn from(value: f32) -> Self {
        Self::Scalar(Scalar::Float(f64::from(value)))
    }
}

impl From<DateTime<Utc>> for Record {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Scalar(Scalar::Timestamp(value))
    }
}

macro_rules! int_into_record {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Record {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::Int(i64::from(value)))
                }
            }
        )*
    };
}

int_into_record!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! int_try_into_record {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for Record {
                type Error = ModelError;

                fn try_from(value: $ty) -> Result<Self, Self::Error> {
                    i64::try_from(value)
                        .map(|int| Self::Scalar(Scalar::Int(int)))
                        .map_err(|_| ModelError::IntegerOverflow(value.to_string()))
                }
            }
        )*
    };
}

// Widths that may not fit i64 on every value or platform.
int_try_into_record!(u64, usize, isize, i128, u128);

impl From<StructRecord> for Record {
    fn from(value: StructRecord) -> Self {
        Self::Struct(value)
    }
}

impl<T: Into<Record>> From<Option<T>> for Record {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Record>> From<Vec<T>> for Record {
    fn from(value: Vec<T>) -> Self {
        Self::Collection(value.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Record>> From<BTreeMap<String, V>> for Record {
    fn from(value: BTreeMap<String, V>) -> Self {
        Self::map(value)
    }
}

impl<V: Into<Record>> From<HashMap<String, V>> for Record {
    fn from(value: HashMap<String, V>) -> Self {
        Self::map(value)
    }
}
