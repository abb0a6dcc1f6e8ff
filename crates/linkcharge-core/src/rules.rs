//! Compiled attribute rules.

use crate::attributes::normalize_key;
use crate::error::{Error, Result};
use crate::field::Field;
use linkcharge_config::{Diagnostic, DiagnosticKind, RuleConfig, Settings};
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One evaluable field-to-attribute mapping.
#[derive(Debug, Clone)]
pub struct AttributeRule {
    field: String,
    pattern: Option<Regex>,
    attribute: String,
    value: Option<String>,
}

impl AttributeRule {
    /// Compile a configured rule.
    pub fn compile(config: &RuleConfig) -> Result<Self> {
        let field = config.field.trim();
        if field.is_empty() {
            return Err(Error::Rule {
                field: config.field.clone(),
                reason: "field name is empty".to_string(),
            });
        }

        let pattern = config
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| Error::Rule {
                field: field.to_string(),
                reason: e.to_string(),
            })?;

        let requested = config.attribute.as_deref().unwrap_or(field);
        let attribute = match normalize_key(requested) {
            Some(key) if key == "tag" => "tags".to_string(),
            Some(key) => key,
            None => {
                return Err(Error::Rule {
                    field: field.to_string(),
                    reason: format!("'{requested}' is not a usable attribute name"),
                })
            }
        };

        Ok(Self {
            field: field.to_string(),
            pattern,
            attribute,
            value: config.value.clone(),
        })
    }

    /// Front-matter field this rule reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Attribute key this rule writes (without prefix).
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Evaluate against a field value. `None` when the value is empty or the
    /// pattern does not match.
    pub fn evaluate(&self, field: &Field, value: &Value) -> Option<String> {
        let formatted = field.format_value(value)?;
        match (&self.pattern, &self.value) {
            (None, None) => Some(formatted),
            (None, Some(template)) => Some(template.clone()),
            (Some(pattern), template) => {
                let captures = pattern.captures(&formatted)?;
                match template {
                    Some(template) => {
                        let mut expanded = String::new();
                        captures.expand(template, &mut expanded);
                        Some(expanded)
                    }
                    None => Some(formatted),
                }
            }
        }
    }
}

/// The active, read-only rule set of a session.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<AttributeRule>,
    fields: HashMap<String, Field>,
    target_tags: bool,
    include_path: bool,
}

impl RuleSet {
    /// Compile the rules of a settings snapshot.
    ///
    /// Rules that cannot be compiled are skipped and reported; the remaining
    /// rules still apply.
    pub fn compile(settings: &Settings) -> (Self, Vec<Diagnostic>) {
        let mut rules = Vec::new();
        let mut diagnostics = Vec::new();

        for config in settings.effective_rules() {
            match AttributeRule::compile(&config) {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    warn!("Skipping attribute rule: {}", e);
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MalformedRule,
                        config.field.clone(),
                        e.to_string(),
                    ));
                }
            }
        }

        let fields = settings
            .fields
            .iter()
            .map(|preset| (preset.name.to_lowercase(), Field::from_preset(preset)))
            .collect();

        debug!(
            "Compiled {} attribute rules ({} skipped)",
            rules.len(),
            diagnostics.len()
        );

        let set = Self {
            rules,
            fields,
            target_tags: settings.target_tags,
            include_path: settings.include_path,
        };
        (set, diagnostics)
    }

    /// Build directly from rules, with no presets or extras.
    pub fn from_rules(rules: Vec<AttributeRule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    /// Whether inline tags are merged into the `tags` attribute.
    pub fn target_tags(&self) -> bool {
        self.target_tags
    }

    /// Whether a `path` attribute is emitted.
    pub fn include_path(&self) -> bool {
        self.include_path
    }

    /// Whether resolving against this set can ever produce an attribute.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && !self.target_tags && !self.include_path
    }

    /// The configured field for `name`, or one discovered from `value`.
    pub fn field_for(&self, name: &str, value: &Value) -> Cow<'_, Field> {
        match self.fields.get(&name.to_lowercase()) {
            Some(field) => Cow::Borrowed(field),
            None => Cow::Owned(Field::discover(name, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkcharge_config::{FieldPreset, FieldType};
    use serde_json::json;

    fn text_field() -> Field {
        Field::discover("status", &json!("x"))
    }

    #[test]
    fn test_copy_rule() {
        let rule = AttributeRule::compile(&RuleConfig::copy_field("Status")).unwrap();
        assert_eq!(rule.attribute(), "status");
        assert_eq!(rule.evaluate(&text_field(), &json!("active")).as_deref(), Some("active"));
    }

    #[test]
    fn test_pattern_and_template() {
        let config = RuleConfig::copy_field("status")
            .with_pattern("^(active|blocked)$")
            .with_attribute("state")
            .with_value("is-$1");
        let rule = AttributeRule::compile(&config).unwrap();

        assert_eq!(rule.attribute(), "state");
        assert_eq!(rule.evaluate(&text_field(), &json!("blocked")).as_deref(), Some("is-blocked"));
        assert_eq!(rule.evaluate(&text_field(), &json!("done")), None);
    }

    #[test]
    fn test_tag_field_writes_tags() {
        let rule = AttributeRule::compile(&RuleConfig::copy_field("tag")).unwrap();
        assert_eq!(rule.attribute(), "tags");
    }

    #[test]
    fn test_malformed_rules_are_reported_and_skipped() {
        let settings = Settings {
            rules: vec![
                RuleConfig::copy_field("status").with_pattern("(unclosed"),
                RuleConfig::copy_field(""),
                RuleConfig::copy_field("type"),
            ],
            ..Settings::default()
        };

        let (rules, diagnostics) = RuleSet::compile(&settings);
        assert_eq!(rules.rules().len(), 1);
        assert_eq!(rules.rules()[0].field(), "type");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::MalformedRule));
    }

    #[test]
    fn test_field_for_prefers_presets() {
        let settings = Settings {
            fields: vec![FieldPreset::new("Due", FieldType::Date)],
            ..Settings::default()
        };
        let (rules, _) = RuleSet::compile(&settings);

        assert_eq!(rules.field_for("due", &json!("x")).field_type, FieldType::Date);
        assert!(!rules.field_for("due", &json!("x")).discovered);
        assert_eq!(rules.field_for("other", &json!(["x"])).field_type, FieldType::List);
    }
}
