use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};

use crate::{LlmChunk, LlmProvider};

const ECHO_CHUNKS: [&str; 2] = [
    "Hello! I am an LLM-API example. ",
    "You should implement your own LLM provider from here!\n",
];

/// Offline provider ("NoModel"): two fixed content chunks, then `Stop("stop")`.
#[derive(Debug, Clone)]
pub struct EchoProvider {
    delay: Duration,
}

impl EchoProvider {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(200),
        }
    }

    /// Pause before each chunk. Zero in tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for EchoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "NoModel"
    }

    fn query(&self, _prompt: &str) -> BoxStream<'static, LlmChunk> {
        let delay = self.delay;
        let chunks = ECHO_CHUNKS
            .iter()
            .map(|s| LlmChunk::Content(s.to_string()))
            .chain(std::iter::once(LlmChunk::stop("stop")));
        stream::iter(chunks)
            .then(move |chunk| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                chunk
            })
            .boxed()
    }
}
