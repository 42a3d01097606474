//! Bot abstraction for sending, editing and reacting to messages.
//!
//! [`Bot`] is transport-agnostic; the teloxide implementation lives in botx-telegram.

use crate::error::{BotxError, Result};
use crate::types::{Chat, Message};
use async_trait::async_trait;

/// Abstraction over the platform's outbound API. Modules only ever talk to the platform through this trait.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Edits an already-sent message. `message_id` is transport-specific (e.g. Telegram numeric string).
    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()>;
    /// Sends a message and returns its id, for later `edit_message` when streaming.
    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String>;
    /// Adds an emoji reaction to `message`.
    async fn add_reaction(&self, message: &Message, emoji: &str) -> Result<()>;
    /// Removes an emoji reaction previously added by the bot.
    async fn delete_reaction(&self, message: &Message, emoji: &str) -> Result<()>;
}

/// Parses a message id string into an i32. Used by transports with numeric ids.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| BotxError::Bot(format!("Invalid message_id: {}", s)))
}
