//! # linkcharge configuration
//!
//! Settings schema for the link attribute engine: which surfaces are enabled,
//! how front-matter fields map to link attributes, which panels are watched,
//! and how long metadata changes are coalesced.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use linkcharge_config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load("config.toml").await?;
//!     for diagnostic in settings.validate() {
//!         eprintln!("{diagnostic}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
mod diagnostic;
mod error;
mod loader;
mod settings;

pub use components::*;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{ConfigError, Result};
pub use loader::default_config_path;
pub use settings::Settings;
