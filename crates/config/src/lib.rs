//! Sierpinski Configuration Module
//!
//! This module provides configuration types for the Sierpinski dashboard client:
//! where the backend API lives, how often each poll loop fires, the parameters
//! of the create-token action, and how the terminal UI and logging behave.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default backend address
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";
/// Environment variable overriding the backend address
pub const API_URL_ENV: &str = "SIERPINSKI_API_URL";
/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Poll loop periods in milliseconds
pub const NETWORK_POLL_MS: u64 = 2_000;
pub const REWARDS_POLL_MS: u64 = 2_000;
pub const TOKENOMICS_POLL_MS: u64 = 5_000;
pub const MINING_POLL_MS: u64 = 100;
pub const TICKER_POLL_MS: u64 = 5_000;

/// Create-token request defaults
pub const DEFAULT_INITIAL_SUPPLY: u64 = 1_000_000;
pub const DEFAULT_OWNER_ADDRESS: &str = "owner_ABC123";

/// Default dashboard redraw period in milliseconds
pub const UI_REFRESH_MS: u64 = 500;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid interval for {field}: must be greater than zero")]
    InvalidInterval { field: &'static str },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// Poll loop periods
    pub polling: PollingConfig,
    /// Create-token request parameters
    pub token: TokenConfig,
    /// Terminal UI settings
    pub ui: UiConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every API path is appended to
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Poll loop periods, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Stats, peers, chain and ledger loop
    pub network_ms: u64,
    /// Mining rewards loop
    pub rewards_ms: u64,
    /// Tokenomics loop
    pub tokenomics_ms: u64,
    /// Fast stats loop active while mining is toggled on
    pub mining_ms: u64,
    /// Static ticker reschedule delay
    pub ticker_ms: u64,
}

/// Parameters sent by the create-token action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub initial_supply: u64,
    pub owner_address: String,
}

/// Terminal UI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Dashboard redraw period in milliseconds
    pub refresh_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path; logs go to stderr when unset
    pub file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            network_ms: NETWORK_POLL_MS,
            rewards_ms: REWARDS_POLL_MS,
            tokenomics_ms: TOKENOMICS_POLL_MS,
            mining_ms: MINING_POLL_MS,
            ticker_ms: TICKER_POLL_MS,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            initial_supply: DEFAULT_INITIAL_SUPPLY,
            owner_address: DEFAULT_OWNER_ADDRESS.to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_ms: UI_REFRESH_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl ApiConfig {
    /// Parses the configured base URL.
    pub fn base_url(&self) -> ConfigResult<Url> {
        let url = Url::parse(self.base_url.trim()).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PollingConfig {
    pub fn network(&self) -> Duration {
        Duration::from_millis(self.network_ms)
    }

    pub fn rewards(&self) -> Duration {
        Duration::from_millis(self.rewards_ms)
    }

    pub fn tokenomics(&self) -> Duration {
        Duration::from_millis(self.tokenomics_ms)
    }

    pub fn mining(&self) -> Duration {
        Duration::from_millis(self.mining_ms)
    }

    pub fn ticker(&self) -> Duration {
        Duration::from_millis(self.ticker_ms)
    }

    fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("polling.network_ms", self.network_ms),
            ("polling.rewards_ms", self.rewards_ms),
            ("polling.tokenomics_ms", self.tokenomics_ms),
            ("polling.mining_ms", self.mining_ms),
            ("polling.ticker_ms", self.ticker_ms),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ConfigError::InvalidInterval { field });
            }
        }
        Ok(())
    }
}

impl UiConfig {
    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }
}

impl DashboardConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Applies overrides using the given variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    /// Checks values that serde cannot constrain.
    pub fn validate(&self) -> ConfigResult<()> {
        self.api.base_url()?;
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidInterval {
                field: "api.timeout_secs",
            });
        }
        self.polling.validate()?;
        if self.ui.refresh_ms == 0 {
            return Err(ConfigError::InvalidInterval {
                field: "ui.refresh_ms",
            });
        }
        Ok(())
    }
}
