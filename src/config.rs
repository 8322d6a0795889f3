//! Configuration management
//!
//! Handles loading and validating client configuration from TOML files.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::backend::Provider;
use crate::error::ClientError;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Client connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Spacing between status re-checks while waiting, in milliseconds
    #[serde(default = "default_polling_interval_ms")]
    pub polling_interval_ms: u64,
    /// Backend provider: "openai" or "anthropic"
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Simulated connect latency of the mock backend, in milliseconds
    #[serde(default = "default_transport_delay_ms")]
    pub connect_delay_ms: u64,
    /// Simulated disconnect latency of the mock backend, in milliseconds
    #[serde(default = "default_transport_delay_ms")]
    pub disconnect_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            polling_interval_ms: default_polling_interval_ms(),
            backend: default_backend(),
            connect_delay_ms: default_transport_delay_ms(),
            disconnect_delay_ms: default_transport_delay_ms(),
        }
    }
}

impl ClientConfig {
    /// Polling settings derived from this configuration
    pub fn polling(&self) -> Result<PollingConfig, ClientError> {
        PollingConfig::new(Duration::from_millis(self.polling_interval_ms))
    }

    /// Resolve the configured backend provider
    pub fn provider(&self) -> Result<Provider, ClientError> {
        self.backend.parse()
    }
}

/// Wait loop settings
///
/// `polling_interval` is always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    polling_interval: Duration,
}

impl PollingConfig {
    /// Create polling settings, rejecting a zero interval
    pub fn new(polling_interval: Duration) -> Result<Self, ClientError> {
        if polling_interval.is_zero() {
            return Err(ClientError::Config(
                "polling_interval must be > 0".to_string(),
            ));
        }
        Ok(Self { polling_interval })
    }

    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            polling_interval: Duration::from_millis(default_polling_interval_ms()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_polling_interval_ms() -> u64 {
    100
}

fn default_backend() -> String {
    "openai".to_string()
}

fn default_transport_delay_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.client.polling_interval_ms == 0 {
            anyhow::bail!("client.polling_interval_ms must be > 0");
        }
        self.client
            .provider()
            .with_context(|| format!("Invalid client.backend: {:?}", self.client.backend))?;
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            anyhow::bail!("logging.format must be \"json\" or \"pretty\"");
        }
        Ok(())
    }
}
