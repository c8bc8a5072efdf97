//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Every section is optional; a missing file section falls back to its
//! defaults.
//!
//! # Example
//!
//! ```no_run
//! use overunder::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ledger::{AccountsConfig, LedgerConfig};
use super::logging::LoggingConfig;
use crate::application::book::BookSettings;
use crate::error::{ConfigError, Result};
use crate::infrastructure::accounts::AccountPolicy;

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Supply and symbol limits.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Account identifier syntax.
    #[serde(default)]
    pub accounts: AccountsConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation
    /// fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] when the file exists.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.ledger.total_supply == 0 {
            return Err(ConfigError::InvalidValue {
                field: "total_supply",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.ledger.max_symbol_len == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_symbol_len",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.accounts.min_len == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_len",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.accounts.max_len < self.accounts.min_len {
            return Err(ConfigError::InvalidValue {
                field: "max_len",
                reason: "must be >= min_len".to_string(),
            }
            .into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Ledger settings for [`WagerBook`](crate::application::WagerBook).
    #[must_use]
    pub fn book_settings(&self) -> BookSettings {
        BookSettings::from(&self.ledger)
    }

    /// Account rules for the configured identifier syntax.
    #[must_use]
    pub fn account_policy(&self) -> AccountPolicy {
        AccountPolicy::from(&self.accounts)
    }
}
