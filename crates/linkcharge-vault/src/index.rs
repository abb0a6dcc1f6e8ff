//! In-memory index of a vault directory.

use crate::error::{Result, VaultError};
use crate::note::parse_note;
use linkcharge_core::link;
use linkcharge_core::{LinkTarget, Metadata, MetadataBatch, MetadataSource};
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, trace};
use walkdir::{DirEntry, WalkDir};

/// Metadata of every markdown note under a root directory, keyed by vault
/// path (`folder/Note.md`, `/`-separated, relative to the root).
#[derive(Debug, Clone)]
pub struct VaultIndex {
    root: PathBuf,
    notes: BTreeMap<String, Metadata>,
}

impl VaultIndex {
    /// Index with no notes, rooted at `root`.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            notes: BTreeMap::new(),
        }
    }

    /// Scan `root` and index every note found.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let mut index = Self::empty(root);
        index.rescan()?;
        Ok(index)
    }

    /// Vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of indexed notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether no notes are indexed.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Vault paths of all notes, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.notes.keys().map(String::as_str)
    }

    /// Metadata of a note by vault path.
    pub fn get(&self, vault_path: &str) -> Option<&Metadata> {
        self.notes.get(vault_path)
    }

    /// Drop everything and walk the root again. Hidden files and folders
    /// (`.obsidian`, `.trash`, ...) are skipped. Returns the number of notes.
    pub fn rescan(&mut self) -> Result<usize> {
        self.notes.clear();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = entry.map_err(|source| VaultError::Scan {
                path: self.root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            let Some(vault_path) = self.vault_path(entry.path()) else {
                continue;
            };
            match std::fs::read_to_string(entry.path()) {
                Ok(content) => self.upsert(&vault_path, &content),
                Err(e) => error!("Failed to read {}: {}", entry.path().display(), e),
            }
        }

        info!("Indexed {} notes under {}", self.notes.len(), self.root.display());
        Ok(self.notes.len())
    }

    /// Vault path of a file under the root, if it is one.
    pub fn vault_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        (!parts.is_empty()).then(|| parts.join("/"))
    }

    /// Index or re-index a note from its content.
    pub fn upsert(&mut self, vault_path: &str, content: &str) {
        trace!("Indexing {}", vault_path);
        self.notes
            .insert(vault_path.to_string(), parse_note(vault_path, content));
    }

    /// Forget a note. Returns whether it was indexed.
    pub fn remove(&mut self, vault_path: &str) -> bool {
        self.notes.remove(vault_path).is_some()
    }

    /// Re-read a changed file: re-indexed if it still exists, forgotten if
    /// not. Non-markdown and out-of-vault paths are ignored.
    pub fn refresh_file(&mut self, path: &Path) -> Result<Option<String>> {
        if !is_markdown(path) {
            return Ok(None);
        }
        let Some(vault_path) = self.vault_path(path) else {
            return Ok(None);
        };
        match std::fs::read_to_string(path) {
            Ok(content) => self.upsert(&vault_path, &content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.remove(&vault_path);
            }
            Err(e) => return Err(e.into()),
        }
        Ok(Some(vault_path))
    }

    /// Refresh a batch of changed files and report which notes changed.
    ///
    /// A file that cannot be read is logged and left out of the batch.
    pub fn apply_changes<'p, I>(&mut self, paths: I) -> MetadataBatch
    where
        I: IntoIterator<Item = &'p Path>,
    {
        let mut changed = Vec::new();
        for path in paths {
            match self.refresh_file(path) {
                Ok(Some(vault_path)) if !changed.contains(&vault_path) => changed.push(vault_path),
                Ok(_) => {}
                Err(e) => error!("Failed to refresh {}: {}", path.display(), e),
            }
        }
        debug!("{} notes changed", changed.len());
        MetadataBatch { paths: changed }
    }
}

impl MetadataSource for VaultIndex {
    fn resolve_link_target(&self, linkpath: &str, source_path: &str) -> Option<LinkTarget> {
        link::first_linkpath_dest(self.paths(), linkpath, source_path).map(LinkTarget::new)
    }

    fn metadata(&self, target: &LinkTarget) -> Option<&Metadata> {
        self.notes.get(&target.path)
    }
}

/// Whether `path` names a markdown file.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_path() {
        let index = VaultIndex::empty("/vault");
        assert_eq!(
            index.vault_path(Path::new("/vault/folder/Note.md")).as_deref(),
            Some("folder/Note.md")
        );
        assert_eq!(index.vault_path(Path::new("/elsewhere/Note.md")), None);
        assert_eq!(index.vault_path(Path::new("/vault")), None);
    }

    #[test]
    fn test_upsert_and_resolve() {
        let mut index = VaultIndex::empty("/vault");
        index.upsert("Projects/Alpha.md", "---\nstatus: active\n---\n");
        index.upsert("Alpha.md", "");

        let from_projects = index.resolve_link_target("Alpha", "Projects/Index.md");
        assert_eq!(from_projects.map(|t| t.path), Some("Projects/Alpha.md".to_string()));

        let from_root = index.resolve_link_target("Alpha", "Index.md");
        assert_eq!(from_root.map(|t| t.path), Some("Alpha.md".to_string()));

        assert!(index.remove("Alpha.md"));
        assert!(!index.remove("Alpha.md"));
    }

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("a/B.md")));
        assert!(is_markdown(Path::new("a/B.MD")));
        assert!(!is_markdown(Path::new("a/B.png")));
    }
}
