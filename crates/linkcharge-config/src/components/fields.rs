//! Field presets
//!
//! A preset declares how a front-matter field should be interpreted when its
//! value is turned into a link attribute.

use serde::{Deserialize, Serialize};

/// Semantic type of a front-matter field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text, rendered verbatim.
    #[default]
    #[serde(alias = "input")]
    Text,
    /// A list of values, rendered space-separated.
    List,
    /// A calendar date, normalized to `YYYY-MM-DD` when parseable.
    Date,
    /// A number.
    Number,
    /// A boolean flag.
    Boolean,
    /// One value out of `options`.
    Select,
    /// Several values out of `options`.
    Multi,
    /// One value cycling through `options`.
    Cycle,
    /// A link to another note.
    File,
}

impl FieldType {
    /// Whether values of this type are rendered as a space-separated list.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::List | Self::Multi)
    }
}

/// A configured field with its presentation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPreset {
    /// Front-matter key.
    pub name: String,

    /// Semantic type.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Allowed values for select-like types.
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldPreset {
    /// Create a preset with no options.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            options: Vec::new(),
        }
    }
}
