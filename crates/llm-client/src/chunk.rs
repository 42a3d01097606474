/// One piece of streamed model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmChunk {
    /// Incremental text.
    Content(String),
    /// Generation finished. `content` is the text that arrived with the stop signal (often empty).
    Stop { reason: String, content: String },
    /// Generation failed; no further chunks follow.
    Error(String),
}

impl LlmChunk {
    pub fn stop(reason: impl Into<String>) -> Self {
        LlmChunk::Stop {
            reason: reason.into(),
            content: String::new(),
        }
    }

    /// `Stop` and `Error` end the stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LlmChunk::Content(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!LlmChunk::Content("a".into()).is_terminal());
        assert!(LlmChunk::stop("stop").is_terminal());
        assert!(LlmChunk::Error("boom".into()).is_terminal());
    }

    #[test]
    fn test_stop_helper_has_empty_content() {
        assert_eq!(
            LlmChunk::stop("length"),
            LlmChunk::Stop {
                reason: "length".to_string(),
                content: String::new()
            }
        );
    }
}
