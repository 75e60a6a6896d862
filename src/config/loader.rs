//! Settings loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Settings;
use crate::config::validation::{validate_settings, InvalidSetting};

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", render_invalid(.0))]
    Validation(Vec<InvalidSetting>),
}

fn render_invalid(errors: &[InvalidSetting]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    settings_from_str(&content)
}

/// Parse and validate settings from TOML text.
pub fn settings_from_str(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content)?;

    validate_settings(&settings).map_err(ConfigError::Validation)?;

    Ok(settings)
}
