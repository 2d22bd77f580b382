//! Declarative field annotations.
//!
//! An annotation is a comma-separated list of tokens:
//! - `primarykey` marks the field that supplies the write key
//! - `-` or `exclude` drops the field from every flattened output
//! - `rename=<name>` replaces the lower-cased field name as output key
//!
//! Unknown tokens are ignored so newer annotations don't break older readers.

use serde::{Deserialize, Serialize};

/// Resolved metadata for a single struct field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldTag {
    /// Field is never surfaced in output.
    pub excluded: bool,
    /// Field supplies the record's primary key.
    pub primary_key: bool,
    /// Output key override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename_to: Option<String>,
}

impl FieldTag {
    /// Parses an annotation string into a tag.
    #[must_use]
    pub fn parse(annotation: &str) -> Self {
        let mut tag = Self::default();

        for token in annotation.split(',').map(str::trim) {
            if token == "-" || token.eq_ignore_ascii_case("exclude") {
                tag.excluded = true;
            } else if token.eq_ignore_ascii_case("primarykey") {
                tag.primary_key = true;
            } else if let Some(name) = token.strip_prefix("rename=") {
                let name = name.trim();
                if !name.is_empty() {
                    tag.rename_to = Some(name.to_string());
                }
            }
        }

        tag
    }

    /// Shorthand for a primary-key tag.
    #[must_use]
    pub fn primary_key() -> Self {
        Self {
            primary_key: true,
            ..Self::default()
        }
    }

    /// Shorthand for an excluded field.
    #[must_use]
    pub fn excluded() -> Self {
        Self {
            excluded: true,
            ..Self::default()
        }
    }

    /// Returns the output key for a field carrying this tag.
    #[must_use]
    pub fn output_key(&self, field_name: &str) -> String {
        match &self.rename_to {
            Some(name) => name.clone(),
            None => field_name.to_lowercase(),
        }
    }
}

