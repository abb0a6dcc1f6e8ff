pub mod check;
pub mod decorate;
pub mod resolve;
pub mod watch;

use anyhow::{Context, Result};
use linkcharge_vault::VaultIndex;
use std::path::Path;

/// Scan the vault at `root`. The root is canonicalized so paths reported by
/// the filesystem watcher map back onto vault paths.
pub fn open_vault(root: &Path) -> Result<VaultIndex> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Vault directory not found: {}", root.display()))?;
    VaultIndex::open(&root).with_context(|| format!("Failed to scan vault {}", root.display()))
}

/// `key=value` pairs of a DOM attribute map, space-separated.
pub fn format_attributes<'a, I>(attributes: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    attributes
        .into_iter()
        .map(|(name, value)| format!("{}={:?}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}
