//! Resolved attribute sets.

use serde::Serialize;
use std::collections::BTreeMap;

/// Prefix carried by every DOM attribute this crate writes.
pub const DATA_LINK_PREFIX: &str = "data-link-";

/// Ordered mapping of attribute key to value for one link target.
///
/// Keys are stored without the `data-link-` prefix; [`AttributeSet::to_dom`]
/// produces the prefixed form written to elements and decorations. A set is
/// recomputed on every resolution and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    entries: BTreeMap<String, String>,
}

impl AttributeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an attribute. The key is normalized.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        if let Some(key) = normalize_key(key) {
            self.entries.insert(key, value.into());
        }
    }

    /// Merge whitespace-separated tokens into `key`, keeping the existing
    /// tokens first and dropping duplicates.
    pub fn merge_tokens(&mut self, key: &str, tokens: &str) {
        if tokens.split_whitespace().next().is_none() {
            return;
        }
        let Some(key) = normalize_key(key) else {
            return;
        };
        let entry = self.entries.entry(key).or_default();
        for token in tokens.split_whitespace() {
            if !entry.split_whitespace().any(|existing| existing == token) {
                if !entry.is_empty() {
                    entry.push(' ');
                }
                entry.push_str(token);
            }
        }
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no attribute was resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The set as DOM attributes, keys prefixed with `data-link-`.
    pub fn to_dom(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(key, value)| (dom_name(key), value.clone()))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key.as_ref(), value);
        }
        set
    }
}

/// DOM attribute name for a key.
pub fn dom_name(key: &str) -> String {
    format!("{DATA_LINK_PREFIX}{key}")
}

/// Whether a DOM attribute name was written by this crate.
pub fn is_data_link_attribute(name: &str) -> bool {
    name.starts_with(DATA_LINK_PREFIX)
}

/// Normalize an attribute key: lowercase, `data-link-` prefix stripped,
/// anything outside `[a-z0-9_-]` replaced with `-`. `None` when nothing is left.
pub fn normalize_key(key: &str) -> Option<String> {
    let lowered = key.trim().to_lowercase();
    let bare = lowered.strip_prefix(DATA_LINK_PREFIX).unwrap_or(&lowered);
    let normalized: String = bare
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let normalized = normalized.trim_matches('-');
    (!normalized.is_empty()).then(|| normalized.to_string())
}
