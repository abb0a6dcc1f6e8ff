//! Metadata fields and value formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use linkcharge_config::{FieldPreset, FieldType};
use serde_json::Value;

/// A named metadata property with its semantic type.
///
/// Fields come from configured presets or are discovered from a document's
/// front-matter, in which case the type is inferred from the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Front-matter key.
    pub name: String,
    /// Semantic type.
    pub field_type: FieldType,
    /// Allowed values for select-like types.
    pub options: Vec<String>,
    /// Whether the field was inferred rather than configured.
    pub discovered: bool,
}

impl Field {
    /// Field built from a configured preset.
    pub fn from_preset(preset: &FieldPreset) -> Self {
        Self {
            name: preset.name.clone(),
            field_type: preset.field_type,
            options: preset.options.clone(),
            discovered: false,
        }
    }

    /// Field inferred from a front-matter value.
    pub fn discover(name: &str, value: &Value) -> Self {
        let field_type = match value {
            Value::Array(_) => FieldType::List,
            Value::Bool(_) => FieldType::Boolean,
            Value::Number(_) => FieldType::Number,
            Value::String(s) if parse_date(s).is_some() => FieldType::Date,
            _ => FieldType::Text,
        };
        Self {
            name: name.to_string(),
            field_type,
            options: Vec::new(),
            discovered: true,
        }
    }

    /// Render a value as an attribute string. `None` for null or empty values.
    pub fn format_value(&self, value: &Value) -> Option<String> {
        let formatted = match (self.field_type, value) {
            (_, Value::Null) => return None,
            (_, Value::Array(items)) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|item| self.format_scalar(item))
                    .collect();
                parts.join(" ")
            }
            (_, scalar) => self.format_scalar(scalar)?,
        };
        (!formatted.is_empty()).then_some(formatted)
    }

    fn format_scalar(&self, value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(match self.field_type {
                FieldType::Date => parse_date(s)
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| s.trim().to_string()),
                FieldType::File => strip_link_brackets(s).to_string(),
                _ => s.trim().to_string(),
            }),
            other => Some(other.to_string()),
        }
    }
}

/// Parse the date forms commonly found in front-matter.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
                .ok()
                .map(|dt| dt.date())
        })
}

/// `[[Note|Alias]]` -> `Note`.
fn strip_link_brackets(s: &str) -> &str {
    let s = s.trim();
    let inner = s
        .strip_prefix("[[")
        .and_then(|rest| rest.strip_suffix("]]"))
        .unwrap_or(s);
    crate::link::link_path(inner)
}
