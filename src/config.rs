//! # Configuration Management
//!
//! Centralized configuration for the header codec.
//!
//! The codec itself is stateless; what a receiver must know up front (the
//! width of short header connection IDs, how much of a version negotiation
//! list to accept, how strictly to treat the fixed bit) lives here, together
//! with the logging setup.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`

use crate::core::types::MAX_CONNECTION_ID_LEN;
use crate::error::{HeaderError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Default width of the destination connection ID in short headers
pub const DEFAULT_SHORT_DCID_LEN: u8 = 8;

/// Default cap on the number of versions accepted in a version negotiation header
pub const DEFAULT_MAX_SUPPORTED_VERSIONS: usize = 64;

/// Hard upper bound for `max_supported_versions`
pub const MAX_SUPPORTED_VERSIONS_LIMIT: usize = 1024;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HeaderConfig {
    /// Wire codec configuration
    #[serde(default)]
    pub codec: CodecConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HeaderConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| HeaderError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| HeaderError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| HeaderError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(len) = std::env::var("QUIC_HEADER_SHORT_DCID_LEN") {
            config.codec.short_dcid_len = len.parse::<u8>().map_err(|e| {
                HeaderError::ConfigError(format!("Invalid QUIC_HEADER_SHORT_DCID_LEN: {e}"))
            })?;
        }

        if let Ok(max) = std::env::var("QUIC_HEADER_MAX_SUPPORTED_VERSIONS") {
            config.codec.max_supported_versions = max.parse::<usize>().map_err(|e| {
                HeaderError::ConfigError(format!(
                    "Invalid QUIC_HEADER_MAX_SUPPORTED_VERSIONS: {e}"
                ))
            })?;
        }

        if let Ok(level) = std::env::var("QUIC_HEADER_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                HeaderError::ConfigError(format!("Invalid QUIC_HEADER_LOG_LEVEL: {level}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HeaderError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| HeaderError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.codec.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HeaderError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Receiver-side knowledge needed to decode headers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Width in bytes of the destination connection ID carried by short
    /// headers. Short headers have no length field, so the receiver must know
    /// it in advance; 0 means short headers carry no connection ID.
    pub short_dcid_len: u8,

    /// Maximum number of versions accepted in a version negotiation header
    pub max_supported_versions: usize,

    /// Reject headers whose fixed bit is clear
    pub require_fixed_bit: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            short_dcid_len: DEFAULT_SHORT_DCID_LEN,
            max_supported_versions: DEFAULT_MAX_SUPPORTED_VERSIONS,
            require_fixed_bit: true,
        }
    }
}

impl CodecConfig {
    /// Validate codec configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.short_dcid_len > MAX_CONNECTION_ID_LEN {
            errors.push(format!(
                "Short header connection ID length too large: {} (maximum: {MAX_CONNECTION_ID_LEN})",
                self.short_dcid_len
            ));
        }

        if self.max_supported_versions == 0 {
            errors.push("Max supported versions must be greater than 0".to_string());
        } else if self.max_supported_versions > MAX_SUPPORTED_VERSIONS_LIMIT {
            errors.push(format!(
                "Max supported versions too large: {} (maximum: {MAX_SUPPORTED_VERSIONS_LIMIT})",
                self.max_supported_versions
            ));
        }

        if !self.require_fixed_bit {
            errors.push(
                "WARNING: Fixed bit check is disabled - not recommended for production"
                    .to_string(),
            );
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level used when `RUST_LOG` is not set
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("quic-header"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        level.to_string().to_ascii_lowercase().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
