//! Attribute rules
//!
//! A rule maps a front-matter field (optionally filtered by a value pattern)
//! to one output attribute.

use serde::{Deserialize, Serialize};

/// One field-to-attribute mapping.
///
/// ```toml
/// [[rules]]
/// field = "status"
/// pattern = "^(active|blocked)$"
/// attribute = "state"
/// value = "is-$1"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Front-matter field the rule reads.
    pub field: String,

    /// Regex the formatted value must match; any value when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Output attribute name; derived from the field name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// Output value template; the formatted field value when absent.
    /// `$0`, `$1`, ... expand to pattern captures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RuleConfig {
    /// A rule that copies `field` verbatim into an attribute of the same name.
    pub fn copy_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            pattern: None,
            attribute: None,
            value: None,
        }
    }

    /// Restrict the rule to values matching `pattern`.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Write the result under `attribute` instead of the field name.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Emit `value` (with capture expansion) instead of the field value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}
