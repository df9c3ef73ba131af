use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config format error: {0}")]
    Format(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Inspector configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct InspectorConfig {
    /// Maximum number of commits a single history walk may visit
    #[serde(default = "default_max_history_depth")]
    pub max_history_depth: usize,

    /// Maximum directory nesting followed when flattening a tree
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,

    /// Reject objects whose header length disagrees with the payload
    #[serde(default = "default_verify_object_length")]
    pub verify_object_length: bool,

    /// chrono format string used for author/committer timestamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

// Default functions for serde
fn default_max_history_depth() -> usize {
    100_000
}

fn default_max_tree_depth() -> usize {
    256
}

fn default_verify_object_length() -> bool {
    true
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            max_history_depth: default_max_history_depth(),
            max_tree_depth: default_max_tree_depth(),
            verify_object_length: default_verify_object_length(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl InspectorConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::Format(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise the default location if present,
    /// otherwise built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = Self::default_location();
        match std::fs::read_to_string(&default_path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    /// Get the default configuration location
    pub fn default_location() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("~/.config"));
        path.push("git-internals");
        path.push("config.toml");
        path
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_history_depth must be greater than zero".to_string(),
            ));
        }
        if self.max_tree_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_tree_depth must be greater than zero".to_string(),
            ));
        }
        if self.timestamp_format.is_empty() {
            return Err(ConfigError::Invalid("timestamp_format is empty".to_string()));
        }
        Ok(())
    }
}
