//! Startup wiring: builds the shared services, loads modules, and runs the dispatcher.
//!
//! [`build_app`] takes the outbound [`Bot`] as a parameter so tests can drive the resulting chain
//! with a mock instead of Telegram.

use std::sync::Arc;

use anyhow::{Context, Result};
use await_selection::{SelectionButtonHandler, SelectionRegistry};
use botx_core::{init_tracing, Bot, BotHandle};
use botx_telegram::{build_teloxide_bot, run_dispatcher, TelegramBotAdapter};
use handler_chain::HandlerChain;
use handlers::{builtin_modules, BuiltinContext};
use llm_client::LlmConfigLoader;
use llm_handlers::AggregatorOptions;
use module_loader::{LoadReport, ModuleLoader};
use storage::UserManager;
use tracing::{info, instrument, warn};

use crate::config::BotConfig;

/// Everything built at startup.
pub struct App {
    pub chain: HandlerChain,
    pub report: LoadReport,
    pub store: Arc<UserManager>,
    pub selections: Arc<SelectionRegistry>,
}

/// Module loader over the built-in modules, restricted by the config's enable-list.
pub fn module_loader(config: &BotConfig, ctx: BuiltinContext) -> ModuleLoader {
    let loader = builtin_modules(ctx)
        .into_iter()
        .fold(ModuleLoader::new(), |loader, entry| loader.register(entry));
    match &config.modules {
        Some(names) => loader.enable_only(names.clone()),
        None => loader,
    }
}

/// Opens the store, loads modules against `bot`, and assembles the handler chain.
#[instrument(skip(config, bot))]
pub async fn build_app(config: &BotConfig, bot: Arc<dyn Bot>) -> Result<App> {
    let store = Arc::new(
        UserManager::open(&config.data_dir)
            .await
            .with_context(|| format!("Failed to open data dir {}", config.data_dir.display()))?,
    );
    info!(
        data_dir = %config.data_dir.display(),
        users = store.dump_user_table().await.len(),
        "User registry opened"
    );

    let selections = Arc::new(SelectionRegistry::new());
    let llm_config = Arc::new(LlmConfigLoader::load(&config.llm_config_file));

    let ctx = BuiltinContext {
        debug: config.debug,
        llm_config,
        aggregator: AggregatorOptions {
            update_every: config.llm_update_every,
            ..Default::default()
        },
        store: store.clone(),
        selections: selections.clone(),
    };

    let mut handle = BotHandle::new(bot);
    handle.on_button_click(Arc::new(SelectionButtonHandler::new(selections.clone())));

    let report = module_loader(config, ctx).load(&mut handle);
    for (name, err) in &report.failed {
        warn!(module = %name, error = %err, "Module not loaded");
    }
    info!(
        loaded = ?report.loaded,
        commands = ?handle.command_names(),
        "Modules loaded"
    );

    let chain = HandlerChain::from_parts(handle.into_parts());
    Ok(App {
        chain,
        report,
        store,
        selections,
    })
}

/// Validates config, initializes tracing, builds the app, and runs until Ctrl-C.
pub async fn run(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file, config.debug)?;

    info!(
        debug = config.debug,
        log_file = %config.log_file,
        telegram_api_url = config.telegram_api_url.as_deref().unwrap_or("default"),
        "Starting botx"
    );

    let teloxide_bot = build_teloxide_bot(
        &config.bot_token,
        config.telegram_api_url.as_deref(),
        config.proxy.as_deref(),
    )
    .context("Failed to build Telegram client")?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    let app = build_app(&config, bot).await?;
    info!("Bot started successfully");

    run_dispatcher(teloxide_bot, app.chain).await
}
