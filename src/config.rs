use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use crate::parser::{ColumnMapping, MissingColumnPolicy, Provider, RowParser};

const VALID_LEVELS: [&str; 6] = ["error", "warn", "info", "debug", "trace", "off"];

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Feed parsing configuration
    #[serde(default)]
    pub feed: FeedConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How feed lines are interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Vendor publishing the feed
    pub provider: Provider,
    /// Header column supplying the value; `close` when unset
    pub value_column: Option<String>,
    /// Reject feeds whose header lacks the configured column
    pub strict_columns: bool,
    /// Directory searched for relative feed paths
    pub data_directory: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            value_column: None,
            strict_columns: true,
            data_directory: PathBuf::from("./data"),
        }
    }
}

impl FeedConfig {
    /// Build a fresh parser from these settings
    pub fn build_parser(&self) -> RowParser {
        let mapping = match &self.value_column {
            Some(column) => ColumnMapping::named(column.clone()),
            None => ColumnMapping::Default,
        };
        let policy = if self.strict_columns {
            MissingColumnPolicy::Fail
        } else {
            MissingColumnPolicy::FallbackToDefault
        };

        RowParser::new(mapping)
            .with_provider(self.provider)
            .with_missing_column_policy(policy)
    }

    /// Resolve a feed path against the data directory
    pub fn resolve_path<P: AsRef<std::path::Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() || path.exists() {
            path.to_path_buf()
        } else {
            self.data_directory.join(path)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file plus environment overrides
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(provider) = env::var("DATALINK_PROVIDER") {
            if let Ok(provider) = provider.parse() {
                self.feed.provider = provider;
            }
        }

        if let Ok(column) = env::var("DATALINK_VALUE_COLUMN") {
            self.feed.value_column = Some(column);
        }

        if let Ok(strict) = env::var("DATALINK_STRICT_COLUMNS") {
            if let Ok(strict) = strict.parse() {
                self.feed.strict_columns = strict;
            }
        }

        if let Ok(data_dir) = env::var("DATALINK_DATA_DIR") {
            self.feed.data_directory = PathBuf::from(data_dir);
        }

        // Directive-style RUST_LOG values are left to EnvFilter
        if let Ok(log_level) = env::var("RUST_LOG") {
            if VALID_LEVELS.contains(&log_level.as_str()) {
                self.logging.level = log_level;
            }
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(column) = &self.feed.value_column {
            if column.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Value column cannot be empty".to_string(),
                ));
            }
            if column.contains(',') {
                return Err(ConfigError::ValidationError(format!(
                    "Value column '{}' cannot contain a comma",
                    column
                )));
            }
        }

        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializeError(String),
}
