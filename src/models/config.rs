//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
///
/// Secrets are not part of this file; see [`Credentials`](super::Credentials).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Homework API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Telegram Bot API settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Polling loop behavior
    #[serde(default)]
    pub poll: PollConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.endpoint)?;
        url::Url::parse(&self.telegram.api_base)?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.poll.initial_lookback_secs < 0 {
            return Err(AppError::validation(
                "poll.initial_lookback_secs must not be negative",
            ));
        }
        Ok(())
    }
}

/// Homework API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Homework statuses endpoint
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Base URL of the Bot API, without the `/bot<token>` suffix
    #[serde(default = "defaults::telegram_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::telegram_api_base(),
        }
    }
}

/// What the polling loop does after a failed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnError {
    /// Log the failure and let it escape the loop, ending the process.
    #[default]
    Terminate,
    /// Log the failure and keep polling.
    LogAndContinue,
}

/// Polling loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay after every cycle, in seconds
    #[serde(default = "defaults::retry")]
    pub retry_secs: u64,

    /// How far back the first request looks, in seconds
    #[serde(default = "defaults::initial_lookback")]
    pub initial_lookback_secs: i64,

    /// Failure policy for a single cycle
    #[serde(default)]
    pub on_error: OnError,
}

impl PollConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_secs)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            retry_secs: defaults::retry(),
            initial_lookback_secs: defaults::initial_lookback(),
            on_error: OnError::default(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // API defaults
    pub fn endpoint() -> String {
        "https://practicum.yandex.ru/api/user_api/homework_statuses/".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "homework-bot/0.1".into()
    }

    // Telegram defaults
    pub fn telegram_api_base() -> String {
        "https://api.telegram.org".into()
    }

    // Poll defaults
    pub fn retry() -> u64 {
        5
    }
    pub fn initial_lookback() -> i64 {
        30 * 24 * 60 * 60
    }

    // Logging defaults
    pub fn log_level() -> String {
        "debug".into()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_values_match_polling_contract() {
        let config = Config::default();
        assert_eq!(config.poll.retry_interval(), Duration::from_secs(5));
        assert_eq!(config.poll.on_error, OnError::Terminate);
        assert_eq!(config.poll.initial_lookback_secs, 2_592_000);
        assert_eq!(
            config.api.endpoint,
            "https://practicum.yandex.ru/api/user_api/homework_statuses/"
        );
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.api.endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[poll]\nretry_secs = 60\non_error = \"log_and_continue\"\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.poll.retry_secs, 60);
        assert_eq!(config.poll.on_error, OnError::LogAndContinue);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.telegram.api_base, "https://api.telegram.org");
    }

    #[test]
    fn unknown_on_error_policy_is_rejected() {
        let result: std::result::Result<Config, _> =
            toml::from_str("[poll]\non_error = \"retry_forever\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
