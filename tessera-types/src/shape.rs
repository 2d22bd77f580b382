//! Record shape descriptor tables.
//!
//! A [`RecordShape`] is built once per struct-like type and lists its fields
//! in declaration order with everything the flattener needs already resolved:
//! output key, visibility and tag. Values never carry their own metadata.

use crate::{FieldTag, Result, ShapeError};
use serde::{Deserialize, Serialize};

/// Whether a field may be surfaced outside its record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Exported,
    Private,
}

/// A single resolved field of a record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Declared field name, as written on the type.
    pub name: String,
    /// Key the field is flattened under.
    pub output_key: String,
    pub visibility: Visibility,
    pub tag: FieldTag,
}

impl FieldDescriptor {
    /// Returns true if the field appears in flattened output.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Exported && !self.tag.excluded
    }
}

/// The descriptor table for one struct-like record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordShape {
    type_name: String,
    fields: Vec<FieldDescriptor>,
    /// Index into `fields` of the primary-key field.
    primary_key: Option<usize>,
}

impl RecordShape {
    /// Starts building a shape for the named type.
    pub fn builder(type_name: impl Into<String>) -> RecordShapeBuilder {
        RecordShapeBuilder {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Returns the type name the shape was declared with.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns every declared field, visible or not, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the shape declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields that appear in flattened output, with their
    /// positional index.
    pub fn visible_fields(&self) -> impl Iterator<Item = (usize, &FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.is_visible())
    }

    /// Returns the index and descriptor of the primary-key field, if declared.
    #[must_use]
    pub fn primary_key(&self) -> Option<(usize, &FieldDescriptor)> {
        self.primary_key.map(|idx| (idx, &self.fields[idx]))
    }

    /// Looks up a field by declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }
}

/// Builder for [`RecordShape`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct RecordShapeBuilder {
    type_name: String,
    fields: Vec<(String, Visibility, FieldTag)>,
}

impl RecordShapeBuilder {
    /// Adds an exported field with the given annotation text.
    #[must_use]
    pub fn field(self, name: impl Into<String>, annotation: &str) -> Self {
        self.field_with_tag(name, Visibility::Exported, FieldTag::parse(annotation))
    }

    /// Adds a private field. Private fields are never flattened, whatever
    /// their annotation says.
    #[must_use]
    pub fn private(self, name: impl Into<String>) -> Self {
        self.field_with_tag(name, Visibility::Private, FieldTag::default())
    }

    /// Adds a field with an already resolved tag.
    #[must_use]
    pub fn field_with_tag(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        tag: FieldTag,
    ) -> Self {
        self.fields.push((name.into(), visibility, tag));
        self
    }

    /// Resolves every field and checks the table is well formed.
    pub fn build(self) -> Result<RecordShape> {
        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(self.fields.len());
        let mut primary_key: Option<usize> = None;

        for (name, visibility, tag) in self.fields {
            if name.is_empty() {
                return Err(ShapeError::EmptyFieldName {
                    shape: self.type_name,
                });
            }
            if fields.iter().any(|f| f.name == name) {
                return Err(ShapeError::DuplicateField {
                    shape: self.type_name,
                    field: name,
                });
            }

            // A private field can't supply the key: it is never written.
            if tag.primary_key && visibility == Visibility::Exported && !tag.excluded {
                if let Some(existing) = primary_key {
                    return Err(ShapeError::DuplicatePrimaryKey {
                        shape: self.type_name,
                        first: fields[existing].name.clone(),
                        second: name,
                    });
                }
                primary_key = Some(fields.len());
            }

            fields.push(FieldDescriptor {
                output_key: tag.output_key(&name),
                name,
                visibility,
                tag,
            });
        }

        Ok(RecordShape {
            type_name: self.type_name,
            fields,
            primary_key,
        })
    }
}
