//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `pwmd.toml` in the working directory (or the file named by
//! `PWMD_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use serde::Deserialize;

use minihub_pwm_domain::error::ValidationError;
use minihub_pwm_domain::settings::PwmSettings;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controller settings: period, limits, dead-man switch.
    pub pwm: PwmSettings,
    /// The simulated output.
    pub relay: RelayConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Virtual relay configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Name used in log lines.
    pub name: String,
    /// Number of edges kept in memory.
    pub history: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting settings are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PWMD_CONFIG").unwrap_or_else(|_| "pwmd.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PWMD_PERIOD_MS")
            && let Ok(period_ms) = val.parse()
        {
            self.pwm.period_ms = period_ms;
        }
        if let Ok(val) = std::env::var("PWMD_DEAD_MAN_MS")
            && let Ok(timeout) = val.parse()
        {
            self.pwm.dead_man_switch_ms = Some(timeout);
        }
        if let Ok(val) = std::env::var("PWMD_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.pwm.validate()?;
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            name: "relay".to_string(),
            history: 256,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "pwmd=info,minihub_pwm_app=info,minihub_pwm_adapter_virtual=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration")]
    Validation(#[from] ValidationError),
}
