//! # Handler chain
//!
//! The event-dispatch object. For each message it runs every handler's `before`, then either the
//! matching `/command` or the handlers' `handle` phase, then every `after` in reverse order.
//! Button clicks go to each registered button handler; one failing handler does not stop the rest.

use botx_core::{
    ButtonClick, ButtonHandler, CommandHandler, HandleParts, Handler, HandlerResponse, Message,
    Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Message handlers, command table and button handlers assembled from loaded modules.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
    commands: HashMap<String, Arc<dyn CommandHandler>>,
    button_handlers: Vec<Arc<dyn ButtonHandler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chain from everything modules registered on the bot handle.
    pub fn from_parts(parts: HandleParts) -> Self {
        Self {
            handlers: parts.handlers,
            commands: parts.commands,
            button_handlers: parts.button_handlers,
        }
    }

    /// Appends a handler (runs in order; first Stop/Reply ends handler phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Registers `/name`; replaces any previous handler for the same name.
    pub fn add_command(mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        let name = name.into();
        if self.commands.insert(name.clone(), handler).is_some() {
            warn!(command = %name, "Command registered twice, previous handler replaced");
        }
        self
    }

    /// Appends a button-click handler.
    pub fn add_button_handler(mut self, handler: Arc<dyn ButtonHandler>) -> Self {
        self.button_handlers.push(handler);
        self
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Runs before, then a matching command or the handle phase, then after in reverse.
    /// Returns Stop when a before returned false or a command ran, the first Stop/Reply otherwise, else Continue.
    #[instrument(skip(self, message))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let mut final_response = HandlerResponse::Continue;

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            message_id = %message.id,
            "step: handler_chain started"
        );

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            if !handler.before(message).await? {
                info!(
                    user_id = message.user.id,
                    handler = %handler_name,
                    "step: handler before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
        }

        let command = message
            .command()
            .and_then(|(name, args)| self.commands.get(&name).map(|h| (name, args, h.clone())));

        match command {
            Some((name, args, command_handler)) => {
                info!(
                    user_id = message.user.id,
                    command = %name,
                    args = args.len(),
                    "step: command dispatched"
                );
                command_handler.handle(message, &args).await?;
                final_response = HandlerResponse::Stop;
            }
            None => {
                for handler in &self.handlers {
                    let handler_name = std::any::type_name_of_val(handler.as_ref());
                    let response = handler.handle(message).await?;
                    debug!(
                        handler = %handler_name,
                        response = ?response,
                        "Handler processed"
                    );

                    match response {
                        HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                            info!(
                                user_id = message.user.id,
                                handler = %handler_name,
                                "step: handler chain stopped by handler"
                            );
                            final_response = response;
                            break;
                        }
                        HandlerResponse::Continue | HandlerResponse::Ignore => continue,
                    }
                }
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(message, &final_response).await?;
        }

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            message_id = %message.id,
            "step: handler_chain finished"
        );

        Ok(final_response)
    }

    /// Delivers a button click to every button handler. Errors are logged, never returned.
    #[instrument(skip(self, click), fields(message_id = %click.message_id))]
    pub async fn handle_button_click(&self, click: &ButtonClick) {
        for handler in &self.button_handlers {
            if let Err(e) = handler.handle(click).await {
                let handler_name = std::any::type_name_of_val(handler.as_ref());
                error!(
                    error = %e,
                    handler = %handler_name,
                    value = %click.value,
                    "Button handler failed"
                );
            }
        }
    }
}

// Tests live in tests/handler_chain_test.rs
