// src/models/mod.rs

//! Domain models for the homework bot.
//!
//! This module contains the data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod credentials;
mod homework;

// Re-export all public types
pub use config::{ApiConfig, Config, LoggingConfig, OnError, PollConfig, TelegramConfig};
pub use credentials::{
    Credentials, PRACTICUM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR, TELEGRAM_TOKEN_VAR,
};
pub use homework::{HomeworkRecord, HomeworkStatus};
