//! [`LlmProvider`] over the OpenAI chat completions streaming API.

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestUserMessageArgs, ChatCompletionResponseStream,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    CreateChatCompletionStreamResponse, FinishReason,
};
use async_openai::Client;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, info, instrument, warn};

use crate::{LlmChunk, LlmError, LlmProvider, ModelConfig};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

const CLIENT_UNAVAILABLE: &str =
    "OpenAI client is not available. Please refer to the logs for more information.";

/// Masks an API key for logs: first 7 + `***` + last 4; keys of 11 chars or fewer become `***`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Streams chat completions for a single user prompt.
#[derive(Clone)]
pub struct OpenAiProvider {
    name: String,
    client: Option<Client<OpenAIConfig>>,
    model: String,
    temperature: f32,
}

impl OpenAiProvider {
    /// Builds a provider from a model config entry.
    ///
    /// A missing `api_key` is not an error: the provider is created, logs a warning, and every
    /// query yields a single [`LlmChunk::Error`]. An unusable proxy is an error.
    pub fn new(name: impl Into<String>, config: &ModelConfig) -> Result<Self, LlmError> {
        let name = name.into();
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let temperature = config.temperature.unwrap_or(DEFAULT_TEMPERATURE);

        let Some(api_key) = config.api_key.as_deref().filter(|k| !k.is_empty()) else {
            warn!(provider = %name, "OpenAI API key not found. Please set it in the config file.");
            return Ok(Self {
                name,
                client: None,
                model,
                temperature,
            });
        };

        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        let client = match config.proxy.as_deref().filter(|p| !p.is_empty()) {
            Some(proxy) => {
                let proxy_cfg = reqwest::Proxy::all(proxy).map_err(|e| LlmError::InvalidProxy {
                    proxy: proxy.to_string(),
                    reason: e.to_string(),
                })?;
                let http_client = reqwest::Client::builder().proxy(proxy_cfg).build()?;
                Client::with_config(openai_config).with_http_client(http_client)
            }
            None => Client::with_config(openai_config),
        };

        info!(
            provider = %name,
            model = %model,
            api_key = %mask_token(api_key),
            proxy = config.proxy.as_deref().unwrap_or("none"),
            "OpenAI provider ready"
        );

        Ok(Self {
            name,
            client: Some(client),
            model,
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn build_request(&self, prompt: &str) -> Result<CreateChatCompletionRequest, OpenAIError> {
        CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .temperature(self.temperature)
            .stream(true)
            .build()
    }
}

enum QueryState {
    Start {
        client: Client<OpenAIConfig>,
        request: CreateChatCompletionRequest,
    },
    Streaming(ChatCompletionResponseStream),
    Done,
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, prompt), fields(provider = %self.name, model = %self.model))]
    fn query(&self, prompt: &str) -> BoxStream<'static, LlmChunk> {
        let Some(client) = self.client.clone() else {
            return stream::once(async { LlmChunk::Error(CLIENT_UNAVAILABLE.to_string()) }).boxed();
        };
        let request = match self.build_request(prompt) {
            Ok(request) => request,
            Err(e) => {
                let reason = e.to_string();
                return stream::once(async move { LlmChunk::Error(reason) }).boxed();
            }
        };
        debug!(prompt_len = prompt.len(), "Starting chat completion stream");

        stream::unfold(QueryState::Start { client, request }, next_chunk).boxed()
    }
}

async fn next_chunk(state: QueryState) -> Option<(LlmChunk, QueryState)> {
    let mut responses = match state {
        QueryState::Done => return None,
        QueryState::Streaming(responses) => responses,
        QueryState::Start { client, request } => match client.chat().create_stream(request).await {
            Ok(responses) => responses,
            Err(e) => return Some((LlmChunk::Error(e.to_string()), QueryState::Done)),
        },
    };

    loop {
        match responses.next().await {
            None => return None,
            Some(Err(e)) => {
                return Some((LlmChunk::Error(format!("Stream error: {}", e)), QueryState::Done))
            }
            Some(Ok(response)) => {
                let Some(chunk) = chunk_from_response(response) else {
                    continue;
                };
                let next = if chunk.is_terminal() {
                    QueryState::Done
                } else {
                    QueryState::Streaming(responses)
                };
                return Some((chunk, next));
            }
        }
    }
}

/// Maps one streamed response to a chunk. `None` when the response carries no choice.
fn chunk_from_response(response: CreateChatCompletionStreamResponse) -> Option<LlmChunk> {
    let choice = response.choices.into_iter().next()?;
    let content = choice.delta.content.unwrap_or_default();
    Some(match choice.finish_reason {
        Some(reason) => LlmChunk::Stop {
            reason: finish_reason_str(reason),
            content,
        },
        None => LlmChunk::Content(content),
    })
}

fn finish_reason_str(reason: FinishReason) -> String {
    serde_json::to_value(&reason)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", reason).to_lowercase())
}
