// src/services/telegram.rs

//! Telegram delivery.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::utils::bot_method_url;

/// Anything that can deliver a text message to a chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Telegram Bot API client, `sendMessage` only.
#[derive(Debug, Clone)]
pub struct TelegramBot {
    client: Client,
    send_url: Url,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope every Bot API reply is wrapped in.
#[derive(Deserialize)]
struct BotReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramBot {
    pub fn new(client: Client, api_base: &str, token: &str) -> Result<Self> {
        Ok(Self {
            client,
            send_url: bot_method_url(api_base, token, "sendMessage")?,
        })
    }
}

#[async_trait]
impl Messenger for TelegramBot {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.send_url.clone())
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            // The URL carries the bot token; keep it out of the error text.
            .map_err(|e| AppError::telegram(e.without_url()))?;

        let status = response.status();
        let reply: Option<BotReply> = response.json().await.ok();
        check_reply(status, reply)
    }
}

/// Accept a reply only when both the HTTP status and the envelope say so.
fn check_reply(status: StatusCode, reply: Option<BotReply>) -> Result<()> {
    match reply {
        Some(BotReply { ok: true, .. }) if status.is_success() => Ok(()),
        Some(BotReply {
            description: Some(description),
            ..
        }) => Err(AppError::telegram(format!("{status}: {description}"))),
        _ => Err(AppError::telegram(format!("unexpected reply, HTTP {status}"))),
    }
}

/// Sends status messages to the one configured chat.
pub struct Notifier<M: Messenger> {
    messenger: M,
    chat_id: String,
}

impl<M: Messenger> Notifier<M> {
    pub fn new(messenger: M, chat_id: impl Into<String>) -> Self {
        Self {
            messenger,
            chat_id: chat_id.into(),
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Deliver `message`; failures come back as [`AppError::TelegramMessage`].
    pub async fn send_message(&self, message: &str) -> Result<()> {
        log::info!("Sending message to chat {}: {}", self.chat_id, message);
        self.messenger
            .send_message(&self.chat_id, message)
            .await
            .map_err(|e| match e {
                AppError::TelegramMessage(_) => e,
                other => AppError::telegram(other),
            })?;
        log::info!("Message sent to chat {}: {}", self.chat_id, message);
        Ok(())
    }
}
