//! Plugin interface: [`Module`] and the [`BotHandle`] a module registers itself on.
//!
//! A module never sees the platform SDK. During `init` it registers commands, message handlers
//! and button handlers on the handle; the dispatch chain is built from the handle afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::bot::Bot;
use crate::error::Result;
use crate::types::{ButtonHandler, CommandHandler, Handler};

/// A plugin. `init` is invoked exactly once at startup with the bot handle.
pub trait Module: Send + Sync {
    fn name(&self) -> &str;
    fn init(&self, handle: &mut BotHandle) -> Result<()>;
}

/// Registration surface handed to [`Module::init`].
pub struct BotHandle {
    bot: Arc<dyn Bot>,
    handlers: Vec<Arc<dyn Handler>>,
    commands: HashMap<String, Arc<dyn CommandHandler>>,
    button_handlers: Vec<Arc<dyn ButtonHandler>>,
}

impl BotHandle {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self {
            bot,
            handlers: Vec::new(),
            commands: HashMap::new(),
            button_handlers: Vec::new(),
        }
    }

    /// Outbound API, for modules that need to send outside of a handler call.
    pub fn bot(&self) -> Arc<dyn Bot> {
        self.bot.clone()
    }

    /// Registers `/name`. A second registration of the same name replaces the first.
    pub fn command(&mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        let name = name.into();
        if self.commands.insert(name.clone(), handler).is_some() {
            warn!(command = %name, "Command registered twice, previous handler replaced");
        }
    }

    /// Registers a handler that sees every inbound message.
    pub fn on_message(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    /// Registers a handler for interactive prompt clicks.
    pub fn on_button_click(&mut self, handler: Arc<dyn ButtonHandler>) {
        self.button_handlers.push(handler);
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn button_handler_count(&self) -> usize {
        self.button_handlers.len()
    }

    /// Consumes the handle into its registrations.
    pub fn into_parts(self) -> HandleParts {
        HandleParts {
            bot: self.bot,
            handlers: self.handlers,
            commands: self.commands,
            button_handlers: self.button_handlers,
        }
    }
}

/// Everything registered on a [`BotHandle`].
pub struct HandleParts {
    pub bot: Arc<dyn Bot>,
    pub handlers: Vec<Arc<dyn Handler>>,
    pub commands: HashMap<String, Arc<dyn CommandHandler>>,
    pub button_handlers: Vec<Arc<dyn ButtonHandler>>,
}
