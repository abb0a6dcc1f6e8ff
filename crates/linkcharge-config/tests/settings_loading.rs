//! Settings loading from TOML files and strings.

use linkcharge_config::{ConfigError, DiagnosticKind, FieldType, Settings, SyncMode};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_empty_document_yields_defaults() {
    let settings = Settings::from_toml_str("").expect("empty config should parse");
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_full_document() {
    let content = r#"
enable_panels = false
quiet_window_ms = 250
target_attributes = ["type", "status"]
target_tags = true

[[rules]]
field = "priority"
pattern = "^(high|urgent)$"
attribute = "hot"
value = "yes"

[[fields]]
name = "due"
type = "date"

[[panels]]
panel_type = "backlink"
selector = ".tree-item-inner"
mode = "dynamic"
"#;

    let settings = Settings::from_toml_str(content).expect("config should parse");
    assert!(!settings.enable_panels);
    assert!(settings.enable_editor);
    assert_eq!(settings.quiet_window_ms, 250);
    assert!(settings.target_tags);
    assert_eq!(settings.effective_rules().len(), 3);
    assert_eq!(settings.rules[0].pattern.as_deref(), Some("^(high|urgent)$"));
    assert_eq!(settings.fields[0].field_type, FieldType::Date);
    assert_eq!(settings.panels.len(), 1);
    assert_eq!(settings.panels[0].mode, SyncMode::Dynamic);
}

#[test]
fn test_malformed_toml_is_an_error() {
    let result = Settings::from_toml_str("enable_panels = [");
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_malformed_rule_is_a_diagnostic_not_an_error() {
    let settings = Settings::from_toml_str("[[rules]]\nfield = \"\"\n").expect("should parse");
    let diagnostics = settings.validate();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::MalformedRule);
}

#[test]
fn test_toml_round_trip_preserves_rules() {
    let settings = Settings::from_toml_str("target_attributes = [\"status\"]").unwrap();
    let rendered = settings.to_toml_string().expect("settings should serialize");
    let reparsed = Settings::from_toml_str(&rendered).unwrap();
    assert_eq!(settings, reparsed);
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "enable_editor = false").unwrap();

    let settings = Settings::load(file.path()).await.expect("file should load");
    assert!(!settings.enable_editor);
}

#[tokio::test]
async fn test_load_or_default_with_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let settings = Settings::load_or_default(Some(&missing)).await.unwrap();
    assert_eq!(settings, Settings::default());
}
