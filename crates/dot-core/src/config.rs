use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::protocol::EncodeOptions;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "DOT_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Preferred output mode for action commands (`pretty`, `text`, `json`).
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_header")]
    pub header: String,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default = "default_true")]
    pub descriptions: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
            color: default_true(),
            descriptions: default_true(),
        }
    }
}

impl CompletionConfig {
    /// Encoder settings derived from this config. An empty header disables
    /// the `HEADER` line.
    #[must_use]
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            header: Some(self.header.clone()).filter(|h| !h.trim().is_empty()),
            color: self.color,
            descriptions: self.descriptions,
        }
    }
}

/// Location of the user config: `$DOT_CONFIG`, else `<config dir>/dot/config.toml`.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|dir| dir.join("dot/config.toml"))
}

/// Load the user config, falling back to defaults when no file exists.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig, ConfigError> {
    match user_config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(UserConfig::default()),
    }
}

/// Load a config file at `path`; a missing file yields defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<UserConfig, ConfigError> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<UserConfig>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn default_header() -> String {
    "dot commands".to_string()
}

const fn default_true() -> bool {
    true
}
