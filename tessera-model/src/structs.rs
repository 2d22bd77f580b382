//! Struct-shaped records.
//!
//! A [`StructRecord`] holds one value per declared field and a shared handle
//! to its [`RecordShape`]. Rust types opt in by implementing [`Tagged`]; the
//! shape is built the first time it is needed and cached in a [`ShapeCell`].

use crate::{ModelError, ModelResult, Record};
use std::sync::{Arc, OnceLock};
use tessera_types::{FieldDescriptor, RecordShape, RecordShapeBuilder, ShapeError};

/// Field values paired with their descriptor table.
#[derive(Debug, Clone, PartialEq)]
pub struct StructRecord {
    shape: Arc<RecordShape>,
    values: Vec<Record>,
}

impl StructRecord {
    /// Pairs values with a shape. Values must be given in declaration order,
    /// one per declared field (private and excluded fields included).
    pub fn new(shape: Arc<RecordShape>, values: Vec<Record>) -> ModelResult<Self> {
        if shape.len() != values.len() {
            return Err(ModelError::ArityMismatch {
                shape: shape.type_name().to_string(),
                expected: shape.len(),
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    /// Returns the shape.
    #[must_use]
    pub fn shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    /// Returns the declared type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.shape.type_name()
    }

    /// Looks up a field value by declared name, visible or not.
    #[must_use]
    pub fn get(&self, field_name: &str) -> Option<&Record> {
        self.shape
            .field(field_name)
            .map(|(idx, _)| &self.values[idx])
    }

    /// Returns the primary-key field and its value, if the shape declares one.
    #[must_use]
    pub fn primary_key(&self) -> Option<(&FieldDescriptor, &Record)> {
        self.shape
            .primary_key()
            .map(|(idx, field)| (field, &self.values[idx]))
    }

    /// Iterates over fields that appear in flattened output.
    pub fn visible_entries(&self) -> impl Iterator<Item = (&FieldDescriptor, &Record)> {
        self.shape
            .visible_fields()
            .map(|(idx, field)| (field, &self.values[idx]))
    }

    /// Consumes the record, yielding visible fields with owned values.
    pub fn into_visible_entries(self) -> impl Iterator<Item = (FieldDescriptor, Record)> {
        let shape = self.shape;
        self.values
            .into_iter()
            .enumerate()
            .filter_map(move |(idx, value)| {
                let field = &shape.fields()[idx];
                field.is_visible().then(|| (field.clone(), value))
            })
    }
}

/// Implemented by Rust types that are written as struct records.
///
/// ```
/// use std::sync::Arc;
/// use tessera_model::{Record, ShapeCell, Tagged};
/// use tessera_types::{RecordShape, ShapeError};
///
/// struct Person {
///     id: String,
///     name: String,
/// }
///
/// impl Tagged for Person {
///     fn shape() -> Result<Arc<RecordShape>, ShapeError> {
///         static SHAPE: ShapeCell = ShapeCell::new();
///         SHAPE.get_or_build(|| {
///             RecordShape::builder("Person")
///                 .field("ID", "primarykey")
///                 .field("Name", "")
///         })
///     }
///
///     fn values(&self) -> Vec<Record> {
///         vec![self.id.as_str().into(), self.name.as_str().into()]
///     }
/// }
///
/// let record = Person { id: "a".into(), name: "x".into() }.to_record().unwrap();
/// assert!(record.is_container());
/// ```
pub trait Tagged {
    /// Returns the cached descriptor table for this type.
    fn shape() -> Result<Arc<RecordShape>, ShapeError>;

    /// Returns one value per declared field, in declaration order.
    fn values(&self) -> Vec<Record>;

    /// Converts the value into a struct record.
    fn to_record(&self) -> ModelResult<Record> {
        let shape = Self::shape()?;
        Ok(Record::Struct(StructRecord::new(shape, self.values())?))
    }
}

/// Lazily built, process-wide cache for one type's shape.
///
/// The builder runs at most once; its outcome, including a build error, is
/// what every later call sees.
#[derive(Debug)]
pub struct ShapeCell(OnceLock<Result<Arc<RecordShape>, ShapeError>>);

impl ShapeCell {
    #[must_use]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the cached shape, building it on first use.
    pub fn get_or_build(
        &self,
        declare: impl FnOnce() -> RecordShapeBuilder,
    ) -> Result<Arc<RecordShape>, ShapeError> {
        self.0
            .get_or_init(|| declare().build().map(Arc::new))
            .clone()
    }
}

impl Default for ShapeCell {
    fn default() -> Self {
        Self::new()
    }
}
