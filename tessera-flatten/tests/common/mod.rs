//! Shared fixtures for flattening tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tessera_model::{Record, ShapeCell, Tagged};
use tessera_types::{RecordShape, ShapeError};

pub struct Person {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub date: DateTime<Utc>,
    pub ignored: String,
    pub flotsom: Record,
    pub secret: String,
}

impl Tagged for Person {
    fn shape() -> Result<Arc<RecordShape>, ShapeError> {
        static SHAPE: ShapeCell = ShapeCell::new();
        SHAPE.get_or_build(|| {
            RecordShape::builder("Person")
                .field("ID", "primarykey")
                .field("Name", "")
                .field("Age", "")
                .field("Date", "")
                .field("IgnoredField", "-")
                .field("Flotsom", "")
                .private("secret")
        })
    }

    fn values(&self) -> Vec<Record> {
        vec![
            self.id.as_str().into(),
            self.name.as_str().into(),
            self.age.into(),
            self.date.into(),
            self.ignored.as_str().into(),
            self.flotsom.clone(),
            self.secret.as_str().into(),
        ]
    }
}

pub fn fixed_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
}

pub fn person(id: &str) -> Person {
    Person {
        id: id.to_string(),
        name: "John".to_string(),
        age: 12,
        date: fixed_date(),
        ignored: "Ignored".to_string(),
        flotsom: Record::Null,
        secret: "hidden".to_string(),
    }
}

/// A person two levels deep: outer → inner → innermost.
pub fn nested_person() -> Person {
    let mut innermost = person("p-3");
    innermost.name = "Innermost".into();
    let mut inner = person("p-2");
    inner.flotsom = innermost.to_record().unwrap();
    let mut outer = person("p-1");
    outer.flotsom = inner.to_record().unwrap();
    outer
}

/// A minimal two-field tagged struct.
pub struct Pair {
    pub id: String,
    pub name: String,
}

impl Tagged for Pair {
    fn shape() -> Result<Arc<RecordShape>, ShapeError> {
        static SHAPE: ShapeCell = ShapeCell::new();
        SHAPE.get_or_build(|| {
            RecordShape::builder("Pair")
                .field("ID", "primarykey")
                .field("Name", "")
        })
    }

    fn values(&self) -> Vec<Record> {
        vec![self.id.as_str().into(), self.name.as_str().into()]
    }
}
