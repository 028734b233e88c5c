//! Application configuration.
//!
//! Configuration is a JSON file with four sections; a missing or malformed
//! file falls back to defaults with a warning rather than failing, so the
//! toolkit stays usable without any setup.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub pool_size: u32,
    pub timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "analytics".to_string(),
            pool_size: 10,
            timeout_secs: 30,
        }
    }
}

/// Logging verbosity and output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Optional log file; stderr only when unset.
    pub file: Option<String>,
    pub include_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            include_timestamps: true,
        }
    }
}

/// Hyperparameters for one named model preset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelPreset {
    pub n_estimators: usize,
    pub max_depth: Option<u32>,
    pub seed: u64,
}

impl Default for ModelPreset {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: Some(10),
            seed: 42,
        }
    }
}

/// Chart rendering settings for downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisualizationConfig {
    pub theme: String,
    pub width: u32,
    pub height: u32,
    pub palette: Vec<String>,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            width: 1280,
            height: 720,
            palette: vec![
                "#4e79a7".to_string(),
                "#f28e2b".to_string(),
                "#e15759".to_string(),
                "#76b7b2".to_string(),
            ],
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub models: HashMap<String, ModelPreset>,
    pub visualization: VisualizationConfig,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file or a file that fails to parse yields the defaults;
    /// both cases are logged, never raised.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "malformed configuration, using defaults");
                    AppConfig::default()
                }
            },
            Err(_) => {
                warn!(path = %path.display(), "configuration file not found, using defaults");
                AppConfig::default()
            }
        }
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Preset for a named model, or the defaults when no preset exists.
    pub fn model_preset(&self, name: &str) -> ModelPreset {
        self.models.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.model_preset("random_forest").n_estimators, 100);
        assert_eq!(config.visualization.theme, "dark");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("/nonexistent/config.json");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = AppConfig::load(&path);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"logging": {"level": "debug"}}"#).unwrap();
        let config = AppConfig::load(&path);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.database, DatabaseConfig::default());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config
            .models
            .insert("fast".to_string(), ModelPreset { n_estimators: 10, max_depth: Some(3), seed: 7 });
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path);
        assert_eq!(loaded, config);
    }
}
