//! Root settings snapshot.

use crate::components::{default_panel_bindings, FieldPreset, PanelBinding, RuleConfig};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Quiet window used to coalesce metadata change notifications.
pub const DEFAULT_QUIET_WINDOW_MS: u64 = 4500;

/// Complete settings for one session. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Keep links in auxiliary panels decorated.
    #[serde(default = "default_true")]
    pub enable_panels: bool,

    /// Decorate links in the live editor view.
    #[serde(default = "default_true")]
    pub enable_editor: bool,

    /// Quiet window for coalescing metadata change notifications.
    #[serde(default = "default_quiet_window_ms")]
    pub quiet_window_ms: u64,

    /// Shorthand: fields copied verbatim into same-named attributes.
    /// Expanded ahead of `rules`.
    #[serde(default)]
    pub target_attributes: Vec<String>,

    /// Merge the target's inline tags into the `tags` attribute.
    #[serde(default)]
    pub target_tags: bool,

    /// Emit a `path` attribute for every resolved target.
    #[serde(default)]
    pub include_path: bool,

    /// Field-to-attribute rules, evaluated in order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Field presets.
    #[serde(default)]
    pub fields: Vec<FieldPreset>,

    /// Watched panels.
    #[serde(default = "default_panel_bindings")]
    pub panels: Vec<PanelBinding>,
}

fn default_true() -> bool {
    true
}

fn default_quiet_window_ms() -> u64 {
    DEFAULT_QUIET_WINDOW_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_panels: true,
            enable_editor: true,
            quiet_window_ms: DEFAULT_QUIET_WINDOW_MS,
            target_attributes: Vec::new(),
            target_tags: false,
            include_path: false,
            rules: Vec::new(),
            fields: Vec::new(),
            panels: default_panel_bindings(),
        }
    }
}

impl Settings {
    /// Quiet window as a duration.
    pub fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.quiet_window_ms)
    }

    /// Rules in evaluation order, with `target_attributes` expanded first.
    pub fn effective_rules(&self) -> Vec<RuleConfig> {
        self.target_attributes
            .iter()
            .map(RuleConfig::copy_field)
            .chain(self.rules.iter().cloned())
            .collect()
    }

    /// Look up the preset for a field, ignoring case.
    pub fn field(&self, name: &str) -> Option<&FieldPreset> {
        self.fields
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
    }

    /// Panel bindings with duplicate panel types removed (first one wins).
    pub fn panel_bindings(&self) -> Vec<&PanelBinding> {
        let mut seen = HashSet::new();
        self.panels
            .iter()
            .filter(|binding| seen.insert(binding.panel_type.as_str()))
            .collect()
    }

    /// Structural checks that do not need regex or selector compilation.
    ///
    /// Problems are reported, never fatal.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (index, rule) in self.effective_rules().iter().enumerate() {
            if rule.field.trim().is_empty() {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedRule,
                    format!("rule #{}", index + 1),
                    "field name is empty",
                ));
            }
        }

        let mut seen = HashSet::new();
        for binding in &self.panels {
            if !seen.insert(binding.panel_type.as_str()) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicatePanelBinding,
                    &binding.panel_type,
                    "panel type bound more than once, later binding ignored",
                ));
            }
            if binding.selector.trim().is_empty() {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedSelector,
                    &binding.panel_type,
                    "selector is empty",
                ));
            }
        }

        diagnostics
    }
}
