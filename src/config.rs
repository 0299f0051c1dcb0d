//! Configuration loaded from `~/.portphelia/config.toml`.

use crate::auth::DEFAULT_MIN_PASSWORD_LENGTH;
use crate::cards::CardColors;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the storage file location.
pub const STORAGE_ENV: &str = "PORTPHELIA_STORAGE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage file; defaults to `~/.portphelia/storage.json`
    pub storage_path: Option<PathBuf>,
    pub min_password_length: usize,
    pub default_colors: CardColors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: None,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            default_colors: CardColors::default(),
        }
    }
}

/// `~/.portphelia`, or `./.portphelia` without a home directory.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".portphelia")
}

impl Config {
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load the default config file; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    /// Check values a config file could have set badly.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.min_password_length == 0 {
            errors.push("min_password_length must be at least 1".to_string());
        }
        let colors = [
            ("background", &self.default_colors.background),
            ("title", &self.default_colors.title),
            ("content", &self.default_colors.content),
        ];
        for (channel, value) in colors {
            if value.trim().is_empty() {
                errors.push(format!("default_colors.{} must not be empty", channel));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Storage location: explicit override, then env, then config, then default.
    pub fn resolve_storage_path(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        if let Ok(path) = std::env::var(STORAGE_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        self.storage_path
            .clone()
            .unwrap_or_else(|| config_dir().join("storage.json"))
    }
}
