//! Adapters from Telegram (teloxide) types to botx_core types.
//! Depends only on teloxide and botx_core type definitions.

use botx_core::{
    ButtonClick, Chat, Message, MessageDirection, ToCoreButtonClick, ToCoreMessage, ToCoreUser,
    User,
};

/// Short chat kind name: `private`, `group`, `supergroup` or `channel`.
fn chat_type(chat: &teloxide::types::Chat) -> &'static str {
    if chat.is_private() {
        "private"
    } else if chat.is_group() {
        "group"
    } else if chat.is_supergroup() {
        "supergroup"
    } else {
        "channel"
    }
}

fn to_core_chat(chat: &teloxide::types::Chat) -> Chat {
    Chat {
        id: chat.id.0,
        chat_type: chat_type(chat).to_string(),
    }
}

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let from = self.0.from.as_ref();
        Message {
            id: self.0.id.to_string(),
            user: from
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: to_core_chat(&self.0.chat),
            content: self
                .0
                .text()
                .or_else(|| self.0.caption())
                .unwrap_or("")
                .to_string(),
            message_type: if self.0.text().is_some() {
                "text".to_string()
            } else {
                "other".to_string()
            },
            direction: MessageDirection::Incoming,
            created_at: self.0.date,
            reply_to_message_id: self.0.reply_to_message().map(|m| m.id.to_string()),
            from_bot: from.map(|u| u.is_bot).unwrap_or(false),
        }
    }
}

/// Wraps a teloxide CallbackQuery (inline keyboard press) for conversion to core [`ButtonClick`].
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> ToCoreButtonClick for TelegramCallbackWrapper<'a> {
    /// `None` when the query carries no data or no originating message (inline-mode buttons).
    fn to_core(&self) -> Option<ButtonClick> {
        let value = self.0.data.clone()?;
        let message = self.0.message.as_ref()?;
        Some(ButtonClick {
            message_id: message.id().to_string(),
            value,
            user: TelegramUserWrapper(&self.0.from).to_core(),
            chat: Some(to_core_chat(message.chat())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telegram_user() -> teloxide::types::User {
        teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        }
    }

    /// **Test: TelegramUserWrapper converts teloxide User to core User with correct id, username, first_name, last_name.**
    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = telegram_user();

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
        assert_eq!(core_user.nickname(), "testuser");
    }
}
