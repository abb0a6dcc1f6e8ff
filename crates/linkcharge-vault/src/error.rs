//! Error types for vault scanning and watching.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or watching a vault.
#[derive(Error, Debug)]
pub enum VaultError {
    /// IO error while reading notes.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Front-matter block that is not a YAML mapping.
    #[error("Invalid front-matter: {0}")]
    Frontmatter(String),

    /// Directory walk failed.
    #[error("Failed to scan {path}: {source}")]
    Scan {
        /// Directory being scanned.
        path: PathBuf,
        /// Underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// File system watching error.
    #[error("File watching error: {0}")]
    Watch(String),
}

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
