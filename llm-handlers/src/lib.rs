//! # llm-handlers
//!
//! - [`StreamAggregator`] – consumes an [`llm_client::LlmChunk`] stream and progressively edits a placeholder message.
//! - [`LlmCommandHandler`] – `/gpt`-style command: sends the placeholder and runs the aggregator.

mod aggregator;
mod command;

pub use aggregator::{
    is_message_not_modified_error, AggregateOutcome, AggregatorOptions, StreamAggregator,
};
pub use command::{LlmCommandHandler, EMPTY_PROMPT_REPLY};
