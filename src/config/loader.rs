use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::types::EngineConfig;
use crate::error::EngineError;

/// Errors that can occur when loading configuration or manifests.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },

    #[error("Invalid command tree: {0}")]
    Tree(#[from] EngineError),
}

/// Read and deserialize a TOML file.
pub(crate) fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

impl EngineConfig {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/cmdroute/config.toml` on Unix/macOS, or the
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("cmdroute").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// - If the file doesn't exist, returns `EngineConfig::default()`.
    /// - Otherwise parses it as TOML and validates.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        Self::load_from(&path)
    }

    /// Loads and validates configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: EngineConfig = read_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - At least one flag/option prefix and one separator
    /// - The help line budget is non-zero
    /// - The help flag, if set, is not empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy.prefixes.iter().all(String::is_empty) {
            return Err(ConfigError::ValidationError {
                message: "At least one non-empty prefix must be configured".to_string(),
            });
        }

        if self.strategy.separators.iter().all(String::is_empty) {
            return Err(ConfigError::ValidationError {
                message: "At least one non-empty separator must be configured".to_string(),
            });
        }

        if self.help.line_budget == 0 {
            return Err(ConfigError::ValidationError {
                message: "help.line_budget must be greater than zero".to_string(),
            });
        }

        if self.dispatch.help_flag.as_deref() == Some("") {
            return Err(ConfigError::ValidationError {
                message: "dispatch.help_flag must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Allow;
    use tempfile::TempDir;

    #[test]
    fn missing_sections_use_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config.help.line_budget, 2000);
        assert_eq!(config.strategy.flags, Allow::Listed(Vec::new()));
        assert_eq!(config.dispatch.help_flag.as_deref(), Some("help"));
        assert_eq!(config.lexer.quotes.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[lexer]
quotes = [["'", "'"]]

[strategy]
prefixes = ["--"]
flags = ["force", "quiet"]
options = true

[dispatch]
case_insensitive = true

[help]
line_budget = 120
"#,
        )
        .unwrap();

        let config = EngineConfig::load_from(&path).unwrap();
        assert_eq!(config.lexer.quotes, vec![('\'', '\'')]);
        assert_eq!(config.strategy.flags, Allow::listed(["force", "quiet"]));
        assert_eq!(config.strategy.options, Allow::All);
        assert!(config.dispatch.case_insensitive);
        assert_eq!(config.help.line_budget, 120);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[help]\nline_budget = 0\n").unwrap();
        assert!(matches!(
            EngineConfig::load_from(&path),
            Err(ConfigError::ValidationError { .. })
        ));

        fs::write(&path, "[strategy]\nseparators = []\n").unwrap();
        assert!(EngineConfig::load_from(&path).is_err());

        fs::write(&path, "invalid { toml }").unwrap();
        assert!(matches!(
            EngineConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let err = EngineConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
