//! Streaming response aggregator.
//!
//! Accumulates streamed chunks and edits a placeholder message every `update_every`
//! modifications, then marks the triggering message with a success or failure indicator.
//! The query is never retried.

use std::sync::Arc;

use botx_core::{Bot, Message};
use futures::stream::BoxStream;
use futures::StreamExt;
use llm_client::LlmChunk;
use tracing::{debug, info, instrument, warn};

/// True when the platform rejects an edit because the text is unchanged; treated as success.
pub fn is_message_not_modified_error(error: &str) -> bool {
    error.contains("message is not modified") || error.contains("exactly the same")
}

/// Tuning and indicator emojis for [`StreamAggregator`].
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    /// Edit the placeholder on every N-th content chunk. Values below 1 are treated as 1.
    pub update_every: usize,
    pub working_indicator: String,
    pub success_indicator: String,
    pub failure_indicator: String,
    /// Replied to the triggering message when the model stopped without producing text.
    pub no_response_text: String,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            update_every: 5,
            working_indicator: "✍".to_string(),
            success_indicator: "👍".to_string(),
            failure_indicator: "👎".to_string(),
            no_response_text: "(No response from the LLM.)".to_string(),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOutcome {
    /// The model sent a stop signal; `text` is the trimmed accumulated response.
    Stopped { reason: String, text: String },
    /// The model (or the stream) failed.
    Errored(String),
}

/// Drives one placeholder message from a chunk stream.
pub struct StreamAggregator {
    bot: Arc<dyn Bot>,
    options: AggregatorOptions,
}

impl StreamAggregator {
    pub fn new(bot: Arc<dyn Bot>, options: AggregatorOptions) -> Self {
        Self { bot, options }
    }

    pub fn options(&self) -> &AggregatorOptions {
        &self.options
    }

    /// Consumes `stream`, editing `placeholder_id` in `message.chat` as text arrives.
    ///
    /// The working indicator is added to `message` first; on the way out it is swapped for the
    /// success or failure indicator. A stream that ends without `Stop` or `Error` counts as failed.
    #[instrument(skip(self, message, stream), fields(chat_id = message.chat.id, placeholder_id = %placeholder_id))]
    pub async fn run(
        &self,
        message: &Message,
        placeholder_id: &str,
        mut stream: BoxStream<'static, LlmChunk>,
    ) -> AggregateOutcome {
        self.react(message, &self.options.working_indicator).await;

        let update_every = self.options.update_every.max(1);
        let mut response_text = String::new();
        let mut modifications: usize = 0;

        let outcome = loop {
            match stream.next().await {
                Some(LlmChunk::Content(content)) => {
                    response_text.push_str(&content);
                    modifications += 1;
                    if modifications % update_every == 0 {
                        self.edit_placeholder(message, placeholder_id, &response_text)
                            .await;
                    }
                }
                Some(LlmChunk::Stop { reason, content }) => {
                    response_text.push_str(&content);
                    break AggregateOutcome::Stopped {
                        reason,
                        text: response_text.trim().to_string(),
                    };
                }
                Some(LlmChunk::Error(reason)) => break AggregateOutcome::Errored(reason),
                None => {
                    break AggregateOutcome::Errored(
                        "stream ended without a stop signal".to_string(),
                    )
                }
            }
        };

        match &outcome {
            AggregateOutcome::Stopped { reason, text } => {
                if text.is_empty() {
                    if let Err(e) = self
                        .bot
                        .reply_to(message, &self.options.no_response_text)
                        .await
                    {
                        warn!(error = %e, "Failed to send no-response reply");
                    }
                } else {
                    self.edit_placeholder(message, placeholder_id, text).await;
                }
                self.unreact(message, &self.options.working_indicator).await;
                self.react(message, &self.options.success_indicator).await;
                info!(
                    reason = %reason,
                    chunks = modifications,
                    response_len = text.len(),
                    "LLM response completed"
                );
            }
            AggregateOutcome::Errored(reason) => {
                self.unreact(message, &self.options.working_indicator).await;
                self.react(message, &self.options.failure_indicator).await;
                warn!(error = %reason, chunks = modifications, "LLM response failed");
            }
        }

        outcome
    }

    /// Marks `message` as failed without running a stream, e.g. when the placeholder could not be sent.
    pub async fn mark_failed(&self, message: &Message, reason: &str) {
        self.react(message, &self.options.failure_indicator).await;
        warn!(error = %reason, "LLM request failed before streaming");
    }

    async fn edit_placeholder(&self, message: &Message, placeholder_id: &str, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match self
            .bot
            .edit_message(&message.chat, placeholder_id, text)
            .await
        {
            Ok(()) => debug!(len = text.len(), "Placeholder updated"),
            Err(e) if is_message_not_modified_error(&e.to_string()) => {}
            Err(e) => warn!(error = %e, "Failed to edit placeholder"),
        }
    }

    async fn react(&self, message: &Message, emoji: &str) {
        if let Err(e) = self.bot.add_reaction(message, emoji).await {
            warn!(error = %e, emoji = %emoji, "Failed to add reaction");
        }
    }

    async fn unreact(&self, message: &Message, emoji: &str) {
        if let Err(e) = self.bot.delete_reaction(message, emoji).await {
            warn!(error = %e, emoji = %emoji, "Failed to delete reaction");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_message_not_modified_error() {
        assert!(is_message_not_modified_error(
            "Bad Request: message is not modified: specified new message content is exactly the same"
        ));
        assert!(!is_message_not_modified_error("Bad Request: chat not found"));
    }

    #[test]
    fn test_default_options() {
        let options = AggregatorOptions::default();
        assert_eq!(options.update_every, 5);
        assert_ne!(options.success_indicator, options.failure_indicator);
    }
}
