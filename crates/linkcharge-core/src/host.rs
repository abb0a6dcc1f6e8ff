//! Interfaces the host application provides.
//!
//! The core never owns the metadata index, the panel layout or the DOM. It
//! reads them through these traits, which keeps the engine testable against
//! in-memory implementations ([`crate::MemoryDom`],
//! [`crate::test_support::MockMetadataSource`]).

use crate::dom::{DomTree, MutationHost, NodeId};
use crate::link;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A document a link resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkTarget {
    /// Vault-relative path, including extension.
    pub path: String,
}

impl LinkTarget {
    /// Target at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// File name without folder or extension.
    pub fn basename(&self) -> &str {
        link::basename(&self.path)
    }
}

/// Structured metadata of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Front-matter properties.
    #[serde(default)]
    pub frontmatter: HashMap<String, Value>,
    /// Inline tags found in the body, without the leading `#`.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Metadata {
    /// Metadata with the given front-matter and no inline tags.
    pub fn with_frontmatter(frontmatter: HashMap<String, Value>) -> Self {
        Self {
            frontmatter,
            tags: Vec::new(),
        }
    }

    /// Look up a front-matter property, preferring an exact key match and
    /// falling back to a case-insensitive one. Among several case variants
    /// the lexicographically smallest key wins.
    pub fn get(&self, name: &str) -> Option<(&str, &Value)> {
        if let Some((key, value)) = self.frontmatter.get_key_value(name) {
            return Some((key.as_str(), value));
        }
        self.frontmatter
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(key, value)| (key.as_str(), value))
    }
}

/// The external metadata index.
pub trait MetadataSource {
    /// Resolve a link path (fragment already stripped) written in the note at
    /// `source_path`. Panels pass an empty source path.
    fn resolve_link_target(&self, linkpath: &str, source_path: &str) -> Option<LinkTarget>;

    /// Metadata of a resolved target, if indexed.
    fn metadata(&self, target: &LinkTarget) -> Option<&Metadata>;
}

/// A batch of metadata changes, as delivered by the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataBatch {
    /// Paths whose metadata changed.
    pub paths: Vec<String>,
}

impl MetadataBatch {
    /// Batch covering `paths`.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lookup of open panels by type.
pub trait PanelRegistry {
    /// Container elements of every open panel of `panel_type`.
    fn open_panels(&self, panel_type: &str) -> Vec<NodeId>;
}

/// Everything the coordinator needs from the host workspace.
pub trait Host: DomTree + MutationHost + PanelRegistry {}

impl<T: DomTree + MutationHost + PanelRegistry + ?Sized> Host for T {}
