//! Loading settings from TOML.

use crate::error::Result;
use crate::settings::Settings;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default location of the configuration file
/// (`~/.config/linkcharge/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("linkcharge").join("config.toml"))
}

impl Settings {
    /// Parse settings from a TOML string. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize settings to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a TOML file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading settings from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    /// Load settings from `path` (or the default location), falling back to
    /// defaults when the file does not exist.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        if !tokio::fs::try_exists(&path).await? {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load(&path).await
    }
}
