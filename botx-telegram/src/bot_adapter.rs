//! Wraps teloxide::Bot and implements [`botx_core::Bot`]. Production code talks to Telegram; tests substitute another Bot impl.

use async_trait::async_trait;
use botx_core::{parse_message_id, Bot as CoreBot, BotxError, Chat, Message, Result};
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ReactionType, ReplyParameters};
use tracing::{error, info, instrument};

/// Builds the teloxide client, optionally through a proxy and against a custom API server.
#[instrument(skip(token))]
pub fn build_teloxide_bot(
    token: &str,
    api_url: Option<&str>,
    proxy: Option<&str>,
) -> anyhow::Result<teloxide::Bot> {
    let bot = match proxy {
        Some(proxy) => {
            let client = teloxide::net::default_reqwest_settings()
                .proxy(reqwest::Proxy::all(proxy)?)
                .build()?;
            info!(proxy = %proxy, "Using proxy for Telegram API");
            teloxide::Bot::with_client(token, client)
        }
        None => teloxide::Bot::new(token),
    };

    Ok(match api_url {
        Some(url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    })
}

/// Thin wrapper around teloxide::Bot that implements botx-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Underlying teloxide::Bot for direct API use.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }

    /// Telegram keeps one reaction per bot and message, so setting replaces the previous one.
    async fn set_reaction(&self, message: &Message, reaction: Vec<ReactionType>) -> Result<()> {
        let id = parse_message_id(&message.id)?;
        self.bot
            .set_message_reaction(ChatId(message.chat.id), MessageId(id))
            .reaction(reaction)
            .await
            .map_err(|e| BotxError::Bot(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| BotxError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| BotxError::Bot(e.to_string()))?;
        Ok(sent.id.to_string())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        let id = parse_message_id(&message.id)?;
        self.bot
            .send_message(ChatId(message.chat.id), text.to_string())
            .reply_parameters(ReplyParameters::new(MessageId(id)))
            .await
            .map_err(|e| BotxError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text)
            .await
            .map_err(|e| BotxError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn add_reaction(&self, message: &Message, emoji: &str) -> Result<()> {
        self.set_reaction(
            message,
            vec![ReactionType::Emoji {
                emoji: emoji.to_string(),
            }],
        )
        .await
    }

    async fn delete_reaction(&self, message: &Message, _emoji: &str) -> Result<()> {
        self.set_reaction(message, Vec::new()).await
    }
}
