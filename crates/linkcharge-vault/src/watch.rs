//! Watching a vault for note changes.

use crate::error::{Result, VaultError};
use crate::index::is_markdown;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Recursive watcher over a vault root.
///
/// Filesystem events are debounced by `notify-debouncer-full` and delivered
/// as batches of changed markdown paths. The watch stops when the watcher is
/// dropped.
pub struct VaultWatcher {
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    root: PathBuf,
}

impl VaultWatcher {
    /// Start watching `root`. Batches arrive on the returned receiver.
    pub fn start(
        root: impl Into<PathBuf>,
        debounce: Duration,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Vec<PathBuf>>)> {
        let root = root.into();
        let (sender, receiver) = mpsc::unbounded_channel();
        let filter_root = root.canonicalize().unwrap_or_else(|_| root.clone());

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let paths = changed_notes(&filter_root, events.iter().map(|e| &e.event));
                    if paths.is_empty() {
                        return;
                    }
                    debug!("{} notes changed on disk", paths.len());
                    if sender.send(paths).is_err() {
                        debug!("Watch receiver dropped");
                    }
                }
                Err(errors) => {
                    for error in errors {
                        error!("Notify error: {:?}", error);
                    }
                }
            }
        })
        .map_err(|e| VaultError::Watch(format!("Failed to create notify watcher: {}", e)))?;

        debouncer
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| VaultError::Watch(format!("Failed to watch {}: {}", root.display(), e)))?;

        info!("Watching {}", root.display());
        Ok((Self { debouncer, root }, receiver))
    }

    /// Watched root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stop watching.
    pub fn stop(self) {
        info!("Stopped watching {}", self.root.display());
        self.debouncer.stop();
    }
}

/// Markdown paths touched by `events`, deduplicated.
///
/// Only create, modify and remove events count; files under hidden folders
/// of the vault are ignored.
pub fn changed_notes<'e, I>(root: &Path, events: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = &'e Event>,
{
    let mut paths: Vec<PathBuf> = Vec::new();
    for event in events {
        if !matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) {
            continue;
        }
        for path in &event.paths {
            if is_markdown(path) && !is_hidden(root, path) && !paths.contains(path) {
                paths.push(path.clone());
            }
        }
    }
    paths
}

fn is_hidden(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root).is_ok_and(|relative| {
        relative.components().any(|c| {
            matches!(c, Component::Normal(part) if part.to_string_lossy().starts_with('.'))
        })
    })
}
