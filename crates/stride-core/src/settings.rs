//! Settings for model selection and the financial estimator
//!
//! Settings are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/stride/config/stride.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! An override only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::financial::FinancialConfig;

/// Embedded default settings (compiled into binary)
const DEFAULT_SETTINGS: &str = include_str!("../../../config/stride.toml");

/// Model selection for the AI backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub progress_model: String,
    pub coaching_model: String,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            progress_model: "gpt-3.5-turbo".to_string(),
            coaching_model: "gpt-4".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ai: AiSettings,
    pub financial: FinancialConfig,
}

impl Settings {
    /// Load from the default override location, else the embedded defaults
    pub fn load() -> Result<Self> {
        match default_settings_path() {
            Some(path) => Self::load_from(&path),
            None => parse_settings(DEFAULT_SETTINGS),
        }
    }

    /// Load from `path` when it exists, else the embedded defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return parse_settings(DEFAULT_SETTINGS);
        }
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Loaded settings override");
        parse_settings(&content)
    }

    /// The settings compiled into the binary
    pub fn embedded() -> Result<Self> {
        parse_settings(DEFAULT_SETTINGS)
    }
}

/// Default settings override path
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("stride").join("config").join("stride.toml"))
}

fn parse_settings(content: &str) -> Result<Settings> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid settings TOML: {}", e)))
}
