//! Test doubles for the host interfaces.
//!
//! In-memory and deterministic, with call counting so tests can assert how
//! often the engine went back to the metadata index.

use crate::host::{LinkTarget, Metadata, MetadataSource};
use crate::link;
use serde_json::Value;
use std::cell::Cell;
use std::collections::BTreeMap;

/// In-memory metadata index keyed by vault path.
#[derive(Debug, Default)]
pub struct MockMetadataSource {
    notes: BTreeMap<String, Metadata>,
    resolve_calls: Cell<usize>,
}

impl MockMetadataSource {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note whose front-matter is the given JSON object.
    pub fn with_note(self, path: &str, frontmatter: Value) -> Self {
        self.with_note_tags(path, frontmatter, &[])
    }

    /// Add a note with front-matter and inline tags.
    pub fn with_note_tags(mut self, path: &str, frontmatter: Value, tags: &[&str]) -> Self {
        self.set_note(path, frontmatter, tags);
        self
    }

    /// Insert or replace a note in place.
    pub fn set_note(&mut self, path: &str, frontmatter: Value, tags: &[&str]) {
        let frontmatter = match frontmatter {
            Value::Object(map) => map.into_iter().collect(),
            _ => Default::default(),
        };
        self.notes.insert(
            path.to_string(),
            Metadata {
                frontmatter,
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        );
    }

    /// Remove a note.
    pub fn remove_note(&mut self, path: &str) {
        self.notes.remove(path);
    }

    /// How many times a link was resolved.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.get()
    }
}

impl MetadataSource for MockMetadataSource {
    fn resolve_link_target(&self, linkpath: &str, source_path: &str) -> Option<LinkTarget> {
        self.resolve_calls.set(self.resolve_calls.get() + 1);
        link::first_linkpath_dest(self.notes.keys().map(String::as_str), linkpath, source_path)
            .map(LinkTarget::new)
    }

    fn metadata(&self, target: &LinkTarget) -> Option<&Metadata> {
        self.notes.get(&target.path)
    }
}
