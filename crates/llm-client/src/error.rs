use thiserror::Error;

/// Errors building a provider. Query-time failures are reported as [`crate::LlmChunk::Error`].
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Invalid proxy {proxy}: {reason}")]
    InvalidProxy { proxy: String, reason: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
