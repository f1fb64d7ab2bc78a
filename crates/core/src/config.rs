//! Application configuration: TOML file plus environment overrides.
//! Precedence is env > file > built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "SASHQUOTE_CONFIG";
pub const LOG_LEVEL_ENV: &str = "SASHQUOTE_LOG";
pub const LOG_FORMAT_ENV: &str = "SASHQUOTE_LOG_FORMAT";
pub const CATALOG_PATH_ENV: &str = "SASHQUOTE_CATALOG";
pub const DEFAULT_MARGIN_ENV: &str = "SASHQUOTE_DEFAULT_MARGIN";

pub const DEFAULT_CONFIG_FILE: &str = "sashquote.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub quoting: QuotingConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotingConfig {
    /// Overall margin a new quote draft starts with.
    pub default_margin_percent: Decimal,
    pub show_gst: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog snapshot exported by the external store.
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unsupported log format: {other}")),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quoting: QuotingConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for QuotingConfig {
    fn default() -> Self {
        Self { default_margin_percent: Decimal::from(45), show_gst: true }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("catalog.json") }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: Box<toml::de::Error> },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let path = options
            .config_path
            .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if options.require_file {
            return Err(ConfigError::MissingConfigFile(path));
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
        toml::from_str(&raw).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }
        if let Ok(format) = env::var(LOG_FORMAT_ENV) {
            self.logging.format = format.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: LOG_FORMAT_ENV.to_string(),
                value: format,
            })?;
        }
        if let Ok(path) = env::var(CATALOG_PATH_ENV) {
            self.catalog.path = PathBuf::from(path);
        }
        if let Ok(margin) = env::var(DEFAULT_MARGIN_ENV) {
            self.quoting.default_margin_percent =
                margin.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: DEFAULT_MARGIN_ENV.to_string(),
                    value: margin,
                })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.quoting.default_margin_percent < Decimal::ZERO {
            return Err(ConfigError::Validation(
                "quoting.default_margin_percent must be >= 0".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}
