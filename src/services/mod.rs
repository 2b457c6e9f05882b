//! External services the bot talks to.

pub mod practicum;
pub mod telegram;

pub use practicum::{HttpTransport, PracticumClient, RawResponse, Transport};
pub use telegram::{Messenger, Notifier, TelegramBot};
