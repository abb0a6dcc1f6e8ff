//! Panel bindings
//!
//! Which auxiliary panels are watched, which elements inside them are links,
//! and how their DOM is expected to change.

use serde::{Deserialize, Serialize};

/// How a panel is kept in sync with its host-driven DOM mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Re-scan every matching element on each mutation batch.
    #[default]
    Full,
    /// Only visit link elements inside newly inserted subtrees.
    Dynamic,
}

/// Binding of a panel type to the selector of its link elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelBinding {
    /// Host identifier of the panel type (e.g. `backlink`).
    pub panel_type: String,

    /// Selector matching link elements inside the panel.
    pub selector: String,

    /// Synchronization mode.
    #[serde(default)]
    pub mode: SyncMode,
}

impl PanelBinding {
    /// Bind a panel type in full mode.
    pub fn full(panel_type: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            panel_type: panel_type.into(),
            selector: selector.into(),
            mode: SyncMode::Full,
        }
    }

    /// Bind a panel type in dynamic mode.
    pub fn dynamic(panel_type: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            panel_type: panel_type.into(),
            selector: selector.into(),
            mode: SyncMode::Dynamic,
        }
    }
}

/// Bindings for the panels a stock workspace ships with.
pub fn default_panel_bindings() -> Vec<PanelBinding> {
    vec![
        PanelBinding::dynamic("backlink", ".tree-item-inner"),
        PanelBinding::dynamic("outgoing-link", ".tree-item-inner"),
        PanelBinding::full("search", ".tree-item-inner"),
        PanelBinding::full("BC-matrix", ".BC-Link"),
        PanelBinding::full("BC-ducks", ".internal-link"),
        PanelBinding::full("BC-tree", "a.internal-link"),
        PanelBinding::full("graph-analysis", ".internal-link"),
        PanelBinding::full("starred", ".nav-file-title-content"),
        PanelBinding::full("file-explorer", ".nav-file-title-content"),
        PanelBinding::full("recent-files", ".nav-file-title-content"),
    ]
}
