//! Non-fatal configuration and runtime diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a non-fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An attribute rule cannot be evaluated and is skipped.
    MalformedRule,
    /// A panel selector cannot be parsed and its binding is skipped.
    MalformedSelector,
    /// Two bindings name the same panel type; the later one is ignored.
    DuplicatePanelBinding,
    /// More than one open instance of a panel type; only the first is wired.
    MultiplePanelInstances,
}

impl DiagnosticKind {
    /// Short stable label used in log output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MalformedRule => "malformed-rule",
            Self::MalformedSelector => "malformed-selector",
            Self::DuplicatePanelBinding => "duplicate-panel-binding",
            Self::MultiplePanelInstances => "multiple-panel-instances",
        }
    }
}

/// A reported problem that degrades behavior without stopping it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The rule, selector or panel type the problem concerns.
    pub subject: String,
    /// Human readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.label(), self.subject, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::MalformedRule,
            "status",
            "unclosed group",
        );
        assert_eq!(diagnostic.to_string(), "[malformed-rule] status: unclosed group");
    }
}
