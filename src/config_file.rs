//! Loading field options from JSON or YAML files

use std::path::Path;

use nodefield_core::{FieldConfig, FieldOptions};
use thiserror::Error;

/// Errors that can occur while reading or writing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension is not one of json, yaml or yml
    #[error("could not determine config format from path: {0}")]
    UnknownFormat(String),
}

/// Serialization format of a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnknownFormat(path.display().to_string()))?;

        match ext.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// Parse options; an empty document means "no overrides"
pub fn parse_options(text: &str, format: ConfigFormat) -> Result<FieldOptions, ConfigError> {
    if text.trim().is_empty() {
        return Ok(FieldOptions::default());
    }
    let options = match format {
        ConfigFormat::Json => serde_json::from_str(text)?,
        ConfigFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(options)
}

/// Read options from a `.json`, `.yaml` or `.yml` file
pub fn load_options(path: &Path) -> Result<FieldOptions, ConfigError> {
    let format = ConfigFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    let options = parse_options(&text, format)?;
    tracing::debug!(path = %path.display(), ?options, "loaded field options");
    Ok(options)
}

pub fn format_config(config: &FieldConfig, format: ConfigFormat) -> Result<String, ConfigError> {
    let text = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(text)
}
