//! Logs every inbound message.

use std::sync::Arc;

use async_trait::async_trait;
use botx_core::{BotHandle, Handler, Message, Module, Result};
use tracing::{debug, info, instrument};

pub struct MessageLoggerModule {
    debug: bool,
}

impl MessageLoggerModule {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Module for MessageLoggerModule {
    fn name(&self) -> &str {
        "message_logger"
    }

    fn init(&self, handle: &mut BotHandle) -> Result<()> {
        handle.on_message(Arc::new(MessageLogger::new(self.debug)));
        Ok(())
    }
}

/// Logs in `before()` so commands are logged too; always continues.
pub struct MessageLogger {
    debug: bool,
}

impl MessageLogger {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

#[async_trait]
impl Handler for MessageLogger {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        if self.debug {
            debug!(
                message_id = %message.id,
                user_id = message.user.id,
                username = %message.user.username.as_deref().unwrap_or("unknown"),
                from_bot = message.from_bot,
                chat_id = message.chat.id,
                chat_type = %message.chat.chat_type,
                content = %message.content,
                "Message inbound"
            );
        }
        info!("<- [{}] {}", message.user.nickname(), message.content);
        Ok(true)
    }
}
