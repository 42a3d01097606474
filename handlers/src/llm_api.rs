//! `/gpt`: streams an OpenAI completion into a placeholder message.

use std::sync::Arc;

use botx_core::{BotHandle, BotxError, Module, Result};
use llm_client::{EchoProvider, LlmConfigLoader, LlmProvider, OpenAiProvider};
use llm_handlers::{AggregatorOptions, LlmCommandHandler};
use tracing::info;

/// Config entry used for `/gpt`.
pub const GPT_CONFIG_KEY: &str = "gpt-4";

pub struct LlmApiModule {
    config: Arc<LlmConfigLoader>,
    options: AggregatorOptions,
}

impl LlmApiModule {
    pub fn new(config: Arc<LlmConfigLoader>, options: AggregatorOptions) -> Self {
        Self { config, options }
    }

    /// OpenAI when a `gpt-4` entry exists, otherwise the offline echo provider.
    fn provider(&self) -> Result<Arc<dyn LlmProvider>> {
        match self.config.get(GPT_CONFIG_KEY) {
            Some(model_config) => {
                let provider = OpenAiProvider::new(GPT_CONFIG_KEY, &model_config)
                    .map_err(|e| BotxError::Module(e.to_string()))?;
                Ok(Arc::new(provider))
            }
            None => {
                info!(
                    key = GPT_CONFIG_KEY,
                    "No LLM config entry, /gpt will use the echo provider"
                );
                Ok(Arc::new(EchoProvider::new()))
            }
        }
    }
}

impl Module for LlmApiModule {
    fn name(&self) -> &str {
        "llm_api"
    }

    fn init(&self, handle: &mut BotHandle) -> Result<()> {
        let provider = self.provider()?;
        let bot = handle.bot();
        handle.command(
            "gpt",
            Arc::new(LlmCommandHandler::new(bot, provider, self.options.clone())),
        );
        Ok(())
    }
}
