// src/config/app.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use super::defaults::*;
use crate::consts::{CONFIG_ENV, DEFAULT_CONFIG_FILE, KEY_VERSION_ENV};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keys: Keys,
    pub paths: Paths,
    pub files: Files,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Keys {
    /// Version new ciphertext is encrypted under
    pub current_version: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub key_dir: PathBuf,
    pub password_file: PathBuf,
}

/// File names inside each per-version directory
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Files {
    pub private_key: String,
    pub wrapped_key: String,
}

impl Default for Keys {
    fn default() -> Self {
        default_keys()
    }
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

impl Default for Files {
    fn default() -> Self {
        default_files()
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply an `AESCBC_KEY_VERSION`-style override
    pub fn override_current_version(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        if let Some(value) = value {
            self.keys.current_version =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidOverride {
                        var: KEY_VERSION_ENV,
                        value: value.to_owned(),
                    })?;
        }
        Ok(())
    }
}

/// Load config from `AESCBC_CONFIG` (default `aescbc.toml`), falling back to
/// built-in defaults when the file doesn't exist. `AESCBC_KEY_VERSION`
/// overrides the current key version.
pub fn load() -> Result<Config, ConfigError> {
    let config_path = std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut conf = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        warn!(
            path = %config_path.display(),
            "config file not found, using built-in defaults"
        );
        Config::default()
    };

    conf.override_current_version(std::env::var(KEY_VERSION_ENV).ok().as_deref())?;

    Ok(conf)
}
