//! # linkcharge vault
//!
//! A directory of markdown notes as a [`MetadataSource`]: front-matter and
//! inline tags are read from disk, links resolve the way Obsidian resolves
//! them, and a [`VaultWatcher`] reports which notes changed so the
//! coordinator can schedule a refresh.
//!
//! [`MetadataSource`]: linkcharge_core::MetadataSource

#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod note;
pub mod watch;

pub use error::{Result, VaultError};
pub use index::VaultIndex;
pub use note::{parse_note, split_frontmatter};
pub use watch::VaultWatcher;
