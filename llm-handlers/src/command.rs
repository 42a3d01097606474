use std::sync::Arc;

use async_trait::async_trait;
use botx_core::{Bot, CommandHandler, Message, Result};
use llm_client::LlmProvider;
use tracing::{info, instrument};

use crate::aggregator::{AggregatorOptions, StreamAggregator};

pub const EMPTY_PROMPT_REPLY: &str = "Please provide a prompt for the LLM.";

/// Text after the command name, with its own line breaks kept. Falls back to `args` when the
/// content does not start with a command.
fn prompt_from(message: &Message, args: &[String]) -> String {
    let content = message.content.trim_start();
    if content.starts_with('/') {
        let rest = content
            .find(char::is_whitespace)
            .map(|idx| &content[idx..])
            .unwrap_or("");
        rest.trim().to_string()
    } else {
        args.join(" ").trim().to_string()
    }
}

/// Answers a command by streaming a provider's response into a placeholder message.
pub struct LlmCommandHandler {
    bot: Arc<dyn Bot>,
    provider: Arc<dyn LlmProvider>,
    aggregator: StreamAggregator,
}

impl LlmCommandHandler {
    pub fn new(bot: Arc<dyn Bot>, provider: Arc<dyn LlmProvider>, options: AggregatorOptions) -> Self {
        let aggregator = StreamAggregator::new(bot.clone(), options);
        Self {
            bot,
            provider,
            aggregator,
        }
    }
}

#[async_trait]
impl CommandHandler for LlmCommandHandler {
    #[instrument(skip(self, message, args), fields(provider = %self.provider.name(), user = %message.user.nickname()))]
    async fn handle(&self, message: &Message, args: &[String]) -> Result<()> {
        let prompt = prompt_from(message, args);
        if prompt.is_empty() {
            return self.bot.reply_to(message, EMPTY_PROMPT_REPLY).await;
        }

        let placeholder = format!("Querying `{}`...", self.provider.name());
        let placeholder_id = match self
            .bot
            .send_message_and_return_id(&message.chat, &placeholder)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                self.aggregator.mark_failed(message, &e.to_string()).await;
                return Ok(());
            }
        };

        info!(prompt_len = prompt.len(), "Querying LLM");
        let stream = self.provider.query(&prompt);
        self.aggregator.run(message, &placeholder_id, stream).await;
        Ok(())
    }
}
