//! # botx-core
//!
//! Core types and traits for the plugin host: [`Bot`], [`Handler`], [`CommandHandler`],
//! [`ButtonHandler`], [`Module`] and [`BotHandle`], message and event types, and tracing
//! initialization. Transport-agnostic; used by handler-chain, module-loader and botx-telegram.

pub mod bot;
pub mod error;
pub mod logger;
pub mod module;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{BotxError, Result};
pub use logger::init_tracing;
pub use module::{BotHandle, HandleParts, Module};
pub use types::{
    ButtonClick, ButtonHandler, Chat, CommandHandler, Handler, HandlerResponse, Message,
    MessageDirection, ToCoreButtonClick, ToCoreMessage, ToCoreUser, User,
};
