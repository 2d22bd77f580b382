//! Conversion between records and wire form.
//!
//! Marshaling:
//! - strings → `S`, integers and floats → `N`, booleans → `BOOL`
//! - timestamps → RFC 3339 `S`, binary → `B`, null → `NULL`
//! - collections → `L`, maps → `M`, structs → `M` of their visible fields
//!
//! Unmarshaling reverses this with two losses inherent to the wire form:
//! timestamps come back as strings, and integral floats come back as
//! integers. Structs come back as maps.

use crate::{AttributeValue, Item, MarshalError, MarshalResult};
use chrono::SecondsFormat;
use std::collections::BTreeMap;
use tessera_model::{FlattenedRecord, Record, Scalar};

/// Converts a flattened record into a storable item.
pub fn marshal_item(flat: &FlattenedRecord) -> MarshalResult<Item> {
    let mut item = Item::new();
    for (key, value) in flat {
        if key.is_empty() {
            return Err(MarshalError::EmptyAttributeName);
        }
        item.insert(key.clone(), marshal_value(key, value)?);
    }
    Ok(item)
}

/// Converts a single record into a wire value.
pub fn marshal(record: &Record) -> MarshalResult<AttributeValue> {
    marshal_value("", record)
}

fn marshal_value(attribute: &str, record: &Record) -> MarshalResult<AttributeValue> {
    let value = match record {
        Record::Null => AttributeValue::Null,
        Record::Scalar(Scalar::String(s)) => AttributeValue::S(s.clone()),
        Record::Scalar(Scalar::Int(n)) => AttributeValue::N(n.to_string()),
        Record::Scalar(Scalar::Float(f)) => {
            if !f.is_finite() {
                return Err(MarshalError::NonFiniteNumber {
                    attribute: attribute.to_string(),
                });
            }
            AttributeValue::N(f.to_string())
        }
        Record::Scalar(Scalar::Bool(b)) => AttributeValue::Bool(*b),
        Record::Scalar(Scalar::Timestamp(ts)) => {
            AttributeValue::S(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        Record::Scalar(Scalar::Binary(bytes)) => AttributeValue::B(bytes.clone()),
        Record::Collection(items) => AttributeValue::L(
            items
                .iter()
                .map(|item| marshal_value(attribute, item))
                .collect::<MarshalResult<_>>()?,
        ),
        Record::Map(entries) => AttributeValue::M(
            entries
                .iter()
                .map(|(k, v)| marshal_value(attribute, v).map(|v| (k.clone(), v)))
                .collect::<MarshalResult<_>>()?,
        ),
        Record::Struct(record) => AttributeValue::M(
            record
                .visible_entries()
                .map(|(field, v)| {
                    marshal_value(attribute, v).map(|v| (field.output_key.clone(), v))
                })
                .collect::<MarshalResult<_>>()?,
        ),
    };
    Ok(value)
}

/// Converts a stored item back into the flattened shape it was written in.
pub fn unmarshal_item(item: Item) -> MarshalResult<FlattenedRecord> {
    item.into_iter()
        .map(|(key, value)| -> MarshalResult<(String, Record)> {
            let record = unmarshal_value(&key, value)?;
            Ok((key, record))
        })
        .collect()
}

/// Converts a single wire value into a record.
pub fn unmarshal(value: AttributeValue) -> MarshalResult<Record> {
    unmarshal_value("", value)
}

fn unmarshal_value(attribute: &str, value: AttributeValue) -> MarshalResult<Record> {
    let record = match value {
        AttributeValue::Null => Record::Null,
        AttributeValue::S(s) => Record::from(s),
        AttributeValue::N(n) => parse_number(attribute, &n)?,
        AttributeValue::Bool(b) => Record::from(b),
        AttributeValue::B(bytes) => Record::binary(bytes),
        AttributeValue::L(items) => Record::Collection(
            items
                .into_iter()
                .map(|item| unmarshal_value(attribute, item))
                .collect::<MarshalResult<_>>()?,
        ),
        AttributeValue::M(entries) => Record::Map(
            entries
                .into_iter()
                .map(|(k, v)| unmarshal_value(attribute, v).map(|v| (k, v)))
                .collect::<MarshalResult<BTreeMap<_, _>>>()?,
        ),
    };
    Ok(record)
}

fn parse_number(attribute: &str, n: &str) -> MarshalResult<Record> {
    if let Ok(int) = n.parse::<i64>() {
        return Ok(Record::from(int));
    }
    match n.parse::<f64>() {
        Ok(float) if float.is_finite() => Ok(Record::from(float)),
        _ => Err(MarshalError::InvalidNumber {
            attribute: attribute.to_string(),
            value: n.to_string(),
        }),
    }
}
