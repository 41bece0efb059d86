//! Configuration management for supower
//!
//! An optional TOML file supplies a default device and default templates.
//! Command line flags take precedence over anything set here.
//!
//! ```toml
//! device = "MX Master 2S"
//!
//! [templates]
//! text = "{Percentage:.0f}%"
//! tooltip = "{Model}: {State}"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// System-wide configuration directory
pub const CONFIG_DIR: &str = "/etc/supower";

/// Name of the configuration file inside each directory
pub const CONFIG_FILE: &str = "config.toml";

/// Template overrides; unset fields keep the built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    pub text: Option<String>,
    pub alt: Option<String>,
    pub tooltip: Option<String>,
    pub class: Option<String>,
    pub percentage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupowerConfig {
    /// Device path or model used when none is given on the command line
    #[serde(default)]
    pub device: Option<String>,

    #[serde(default)]
    pub templates: TemplateConfig,
}

impl SupowerConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the first existing file among the default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_first(&default_paths())
    }

    /// Load the first existing file in `candidates`, or defaults if none exists
    pub fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// User configuration first, then the system-wide file
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|dir| !dir.is_empty()) {
        paths.push(PathBuf::from(dir).join("supower").join(CONFIG_FILE));
    }
    if let Some(home) = std::env::var_os("HOME").filter(|home| !home.is_empty()) {
        paths.push(
            PathBuf::from(home)
                .join(".config")
                .join("supower")
                .join(CONFIG_FILE),
        );
    }

    paths.push(Path::new(CONFIG_DIR).join(CONFIG_FILE));
    paths
}
