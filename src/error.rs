// src/error.rs

//! Unified error handling for the homework bot.

use std::fmt;

use thiserror::Error;

/// Result type alias for bot operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request to the homework API could not be completed
    #[error("Homework API request failed: {0}")]
    RequestApi(String),

    /// Homework API answered with something other than 200 OK
    #[error("Homework API responded with status {status}")]
    ApiStatusCode { status: u16 },

    /// Response body has the wrong JSON type
    #[error("Unexpected response type: {0}")]
    ResponseType(String),

    /// Response or homework record is missing a key, or a key has the wrong shape
    #[error("Response key error: {0}")]
    ResponseKey(String),

    /// Homework status is absent or not one of the known values
    #[error("Unknown homework status: {0}")]
    HomeworkStatus(String),

    /// Telegram refused or failed to deliver a message
    #[error("Failed to send Telegram message: {0}")]
    TelegramMessage(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A polling cycle failed; wraps the step error that caused it
    #[error("Program failure: {0}")]
    Cycle(#[source] Box<AppError>),
}

impl AppError {
    /// Create a homework API transport error.
    pub fn request_api(message: impl fmt::Display) -> Self {
        Self::RequestApi(message.to_string())
    }

    /// Create a response type error.
    pub fn response_type(message: impl Into<String>) -> Self {
        Self::ResponseType(message.into())
    }

    /// Create a response key error.
    pub fn response_key(message: impl Into<String>) -> Self {
        Self::ResponseKey(message.into())
    }

    /// Create an unknown status error.
    pub fn homework_status(status: impl fmt::Display) -> Self {
        Self::HomeworkStatus(status.to_string())
    }

    /// Create a Telegram delivery error.
    pub fn telegram(message: impl fmt::Display) -> Self {
        Self::TelegramMessage(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a step error as a failed polling cycle.
    pub fn cycle(source: AppError) -> Self {
        Self::Cycle(Box::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_message_contains_code() {
        let err = AppError::ApiStatusCode { status: 403 };
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_cycle_wraps_source_message() {
        let err = AppError::cycle(AppError::homework_status("unknown_status"));
        let message = err.to_string();
        assert!(message.starts_with("Program failure:"));
        assert!(message.contains("unknown_status"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
