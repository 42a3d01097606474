//! Dispatcher runner: converts teloxide updates to core types and hands them to the HandlerChain.
//!
//! Messages and callback queries each run on their own spawned task so a slow handler (an LLM
//! stream, for instance) never blocks the update loop.

use std::sync::Arc;

use anyhow::Result;
use botx_core::{ToCoreButtonClick, ToCoreMessage};
use handler_chain::HandlerChain;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};

/// Runs until Ctrl-C. Logs the bot's username first when `get_me` succeeds.
#[instrument(skip(bot, chain))]
pub async fn run_dispatcher(bot: teloxide::Bot, chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            username = %me.user.username.as_deref().unwrap_or("unknown"),
            "Connected to Telegram"
        ),
        Err(e) => warn!(error = %e, "get_me failed, starting dispatcher anyway"),
    }

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![Arc::new(chain)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}

fn schema() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback_query))
}

async fn on_message(msg: teloxide::types::Message, chain: Arc<HandlerChain>) -> ResponseResult<()> {
    let core_msg = TelegramMessageWrapper(&msg).to_core();
    debug!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        message_id = %core_msg.id,
        "Received message"
    );

    tokio::spawn(async move {
        if let Err(e) = chain.handle(&core_msg).await {
            error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
        }
    });
    respond(())
}

async fn on_callback_query(
    bot: Bot,
    q: CallbackQuery,
    chain: Arc<HandlerChain>,
) -> ResponseResult<()> {
    // Stops the client-side loading spinner; failure only affects the UI.
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    let Some(click) = TelegramCallbackWrapper(&q).to_core() else {
        debug!(user_id = q.from.id.0, "Callback query without data or message, ignored");
        return respond(());
    };
    debug!(
        user_id = click.user.id,
        message_id = %click.message_id,
        value = %click.value,
        "Received button click"
    );

    tokio::spawn(async move {
        chain.handle_button_click(&click).await;
    });
    respond(())
}
