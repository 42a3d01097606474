//! # botx-telegram
//!
//! Telegram transport: adapters from teloxide types, the [`botx_core::Bot`] implementation, and the
//! dispatcher runner that feeds messages and button clicks into a [`handler_chain::HandlerChain`].
//! Modules never see teloxide; everything they need goes through `botx_core`.

mod adapters;
mod bot_adapter;
mod runner;

pub use adapters::{TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::{build_teloxide_bot, TelegramBotAdapter};
pub use runner::run_dispatcher;
