//! Core types: user, chat, message, button click, handler response, and the handler traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Display name: username, else first name, else the numeric id.
    pub fn nickname(&self) -> String {
        self.username
            .clone()
            .or_else(|| self.first_name.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// Chat (channel or private) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// A single inbound or outbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub message_type: String,
    pub direction: MessageDirection,
    pub created_at: DateTime<Utc>,
    pub reply_to_message_id: Option<String>,
    /// Whether the sender is a bot account.
    pub from_bot: bool,
}

impl Message {
    /// Splits `/name arg1 arg2` into `("name", ["arg1", "arg2"])`.
    ///
    /// A `@botname` suffix on the command (`/hi@my_bot`) is dropped. Returns `None`
    /// when the content does not start with `/` or the name is empty.
    pub fn command(&self) -> Option<(String, Vec<String>)> {
        let rest = self.content.trim_start().strip_prefix('/')?;
        if rest.starts_with(char::is_whitespace) {
            return None;
        }
        let mut parts = rest.split_whitespace();
        let head = parts.next()?;
        let name = head.split('@').next().unwrap_or(head);
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), parts.map(str::to_string).collect()))
    }
}

/// Direction of the message (from user or from bot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

/// A click on an interactive prompt button: which message the prompt was, and which value was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonClick {
    pub message_id: String,
    pub value: String,
    pub user: User,
    pub chat: Option<Chat>,
}

/// Handler result for the chain. `Reply(text)` carries the response body so later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and attach reply text.
    Reply(String),
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Converts a transport-specific button callback to core [`ButtonClick`]. `None` when the event carries no choice.
pub trait ToCoreButtonClick: Send + Sync {
    fn to_core(&self) -> Option<ButtonClick>;
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop or Reply to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &Message,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

/// Handles `/name args...`. `args` are the whitespace-separated words after the command name.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, message: &Message, args: &[String]) -> crate::error::Result<()>;
}

/// Receives every [`ButtonClick`] the platform delivers.
#[async_trait]
pub trait ButtonHandler: Send + Sync {
    async fn handle(&self, click: &ButtonClick) -> crate::error::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str) -> Message {
        Message {
            id: "1".to_string(),
            user: User {
                id: 7,
                username: None,
                first_name: Some("Ann".to_string()),
                last_name: None,
            },
            chat: Chat {
                id: 9,
                chat_type: "private".to_string(),
            },
            content: content.to_string(),
            message_type: "text".to_string(),
            direction: MessageDirection::Incoming,
            created_at: Utc::now(),
            reply_to_message_id: None,
            from_bot: false,
        }
    }

    #[test]
    fn test_command_with_args() {
        let (name, args) = message("/hi Kun Bot").command().unwrap();
        assert_eq!(name, "hi");
        assert_eq!(args, vec!["Kun", "Bot"]);
    }

    #[test]
    fn test_command_strips_bot_suffix() {
        let (name, args) = message("/hello@my_bot").command().unwrap();
        assert_eq!(name, "hello");
        assert!(args.is_empty());
    }

    #[test]
    fn test_not_a_command() {
        assert!(message("hello").command().is_none());
        assert!(message("/").command().is_none());
        assert!(message("/ hello").command().is_none());
    }

    #[test]
    fn test_nickname_fallbacks() {
        let m = message("x");
        assert_eq!(m.user.nickname(), "Ann");
        let anonymous = User {
            id: 42,
            username: None,
            first_name: None,
            last_name: None,
        };
        assert_eq!(anonymous.nickname(), "42");
    }
}
