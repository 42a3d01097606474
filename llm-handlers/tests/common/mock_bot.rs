//! Mock implementation of [`botx_core::Bot`] for integration tests.
//!
//! Records every outbound call in order so tests can assert on edits, replies and reactions
//! without a platform connection.

use std::sync::Mutex;

use async_trait::async_trait;
use botx_core::{Bot, BotxError, Chat, Message, MessageDirection, Result, User};
use chrono::Utc;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send(String),
    Reply(String),
    Edit { message_id: String, text: String },
    AddReaction(String),
    DeleteReaction(String),
}

/// Mock Bot that records calls and returns a fixed placeholder message id.
pub struct MockBot {
    placeholder_id: String,
    fail_send: bool,
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl MockBot {
    pub fn new() -> Self {
        Self {
            placeholder_id: "1".to_string(),
            fail_send: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `send_message_and_return_id` fails.
    pub fn failing_send() -> Self {
        Self {
            fail_send: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Reactions still present after all add/delete calls, in order of addition.
    pub fn reactions(&self) -> Vec<String> {
        let mut current: Vec<String> = Vec::new();
        for call in self.calls() {
            match call {
                Call::AddReaction(e) => current.push(e),
                Call::DeleteReaction(e) => current.retain(|x| *x != e),
                _ => {}
            }
        }
        current
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> Result<()> {
        self.record(Call::Send(text.to_string()));
        Ok(())
    }

    async fn reply_to(&self, _message: &Message, text: &str) -> Result<()> {
        self.record(Call::Reply(text.to_string()));
        Ok(())
    }

    async fn edit_message(&self, _chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        self.record(Call::Edit {
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_message_and_return_id(&self, _chat: &Chat, text: &str) -> Result<String> {
        if self.fail_send {
            return Err(BotxError::Bot("network down".to_string()));
        }
        self.record(Call::Send(text.to_string()));
        Ok(self.placeholder_id.clone())
    }

    async fn add_reaction(&self, _message: &Message, emoji: &str) -> Result<()> {
        self.record(Call::AddReaction(emoji.to_string()));
        Ok(())
    }

    async fn delete_reaction(&self, _message: &Message, emoji: &str) -> Result<()> {
        self.record(Call::DeleteReaction(emoji.to_string()));
        Ok(())
    }
}

#[allow(dead_code)]
pub fn create_test_message(content: &str) -> Message {
    Message {
        id: "42".to_string(),
        content: content.to_string(),
        user: User {
            id: 123,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 456,
            chat_type: "private".to_string(),
        },
        message_type: "text".to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
        reply_to_message_id: None,
        from_bot: false,
    }
}
