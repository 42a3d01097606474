//! # LLM provider boundary
//!
//! Defines the [`LlmProvider`] trait, the streamed [`LlmChunk`], the JSON [`LlmConfigLoader`], and
//! two providers: [`OpenAiProvider`] (async-openai) and [`EchoProvider`] (offline demo).
//! Transport-agnostic; used by llm-handlers and the built-in `llm_api` module.

use futures::stream::BoxStream;

mod chunk;
mod config;
mod echo;
mod error;
mod openai;

pub use chunk::LlmChunk;
pub use config::{proxy_from_env, LlmConfigLoader, ModelConfig, DEFAULT_LLM_CONFIG_FILE, PROXY_ENV_VARS};
pub use echo::EchoProvider;
pub use error::LlmError;
pub use openai::{mask_token, OpenAiProvider, DEFAULT_OPENAI_MODEL, DEFAULT_TEMPERATURE};

/// A streaming text model.
///
/// `query` never fails up front: setup and transport problems are delivered as a single
/// [`LlmChunk::Error`] so callers have one place to handle them. A well-behaved stream ends right
/// after its first terminal chunk.
pub trait LlmProvider: Send + Sync {
    /// Display name, shown to users while a query is running.
    fn name(&self) -> &str;

    fn query(&self, prompt: &str) -> BoxStream<'static, LlmChunk>;
}
