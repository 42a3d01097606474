//! Unit test module
//!
//! Module tests live here, separate from source files. A recording bot stands in for the platform.

mod builtin_modules_test;
mod message_logger_test;

use std::sync::Mutex;

use async_trait::async_trait;
use botx_core::{Bot, Chat, Message, MessageDirection, Result, User};
use chrono::Utc;

/// Records replies; everything else succeeds silently.
#[derive(Default)]
pub(crate) struct RecordingBot {
    pub replies: Mutex<Vec<String>>,
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, _chat: &Chat, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn reply_to(&self, _message: &Message, text: &str) -> Result<()> {
        self.replies.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn edit_message(&self, _chat: &Chat, _message_id: &str, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn send_message_and_return_id(&self, _chat: &Chat, _text: &str) -> Result<String> {
        Ok("1".to_string())
    }

    async fn add_reaction(&self, _message: &Message, _emoji: &str) -> Result<()> {
        Ok(())
    }

    async fn delete_reaction(&self, _message: &Message, _emoji: &str) -> Result<()> {
        Ok(())
    }
}

pub(crate) fn sample_message(content: &str) -> Message {
    Message {
        id: "msg-1".to_string(),
        user: User {
            id: 7,
            username: Some("testuser".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 123,
            chat_type: "group".to_string(),
        },
        content: content.to_string(),
        message_type: "text".to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
        reply_to_message_id: None,
        from_bot: false,
    }
}
