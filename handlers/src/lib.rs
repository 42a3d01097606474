//! # Built-in modules
//!
//! - [`HelloWorldModule`] – `/hello` and `/hi`
//! - [`MessageLoggerModule`] – logs every inbound message
//! - [`LlmApiModule`] – `/gpt`, streamed from the configured provider
//!
//! [`builtin_modules`] is the registration list handed to the module loader.

mod hello_world;
mod llm_api;
mod message_logger;

#[cfg(test)]
mod test;

use std::sync::Arc;

use await_selection::SelectionRegistry;
use botx_core::Module;
use llm_client::LlmConfigLoader;
use llm_handlers::AggregatorOptions;
use module_loader::ModuleEntry;
use storage::UserManager;

pub use hello_world::{HelloCommand, HelloWorldModule, HiCommand};
pub use llm_api::{LlmApiModule, GPT_CONFIG_KEY};
pub use message_logger::{MessageLogger, MessageLoggerModule};

/// Shared services and settings handed to module factories.
///
/// `store` and `selections` are the injection point for game modules registered next to the
/// built-ins; none of the three built-ins needs them.
#[derive(Clone)]
pub struct BuiltinContext {
    pub debug: bool,
    pub llm_config: Arc<LlmConfigLoader>,
    pub aggregator: AggregatorOptions,
    /// User registry and per-user data store.
    pub store: Arc<UserManager>,
    /// Pending interactive prompts; already wired to button clicks.
    pub selections: Arc<SelectionRegistry>,
}

/// Names of the built-in modules, in load order.
pub const BUILTIN_MODULES: [&str; 3] = ["hello_world", "message_logger", "llm_api"];

/// Every built-in module, in load order.
pub fn builtin_modules(ctx: BuiltinContext) -> Vec<ModuleEntry> {
    let debug = ctx.debug;
    let llm_config = ctx.llm_config;
    let aggregator = ctx.aggregator;
    vec![
        ModuleEntry::new(BUILTIN_MODULES[0], || {
            Ok(Box::new(HelloWorldModule) as Box<dyn Module>)
        }),
        ModuleEntry::new(BUILTIN_MODULES[1], move || {
            Ok(Box::new(MessageLoggerModule::new(debug)) as Box<dyn Module>)
        }),
        ModuleEntry::new(BUILTIN_MODULES[2], move || {
            Ok(Box::new(LlmApiModule::new(llm_config.clone(), aggregator.clone())) as Box<dyn Module>)
        }),
    ]
}
