//! `/hello` replies "... world!"; `/hi <names>` replies "Hey there, <names>!".

use std::sync::Arc;

use async_trait::async_trait;
use botx_core::{Bot, BotHandle, CommandHandler, Message, Module, Result};

pub struct HelloWorldModule;

impl Module for HelloWorldModule {
    fn name(&self) -> &str {
        "hello_world"
    }

    fn init(&self, handle: &mut BotHandle) -> Result<()> {
        let bot = handle.bot();
        handle.command("hello", Arc::new(HelloCommand { bot: bot.clone() }));
        handle.command("hi", Arc::new(HiCommand { bot }));
        Ok(())
    }
}

pub struct HelloCommand {
    bot: Arc<dyn Bot>,
}

impl HelloCommand {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CommandHandler for HelloCommand {
    async fn handle(&self, message: &Message, _args: &[String]) -> Result<()> {
        self.bot.reply_to(message, "... world!").await
    }
}

pub struct HiCommand {
    bot: Arc<dyn Bot>,
}

impl HiCommand {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CommandHandler for HiCommand {
    async fn handle(&self, message: &Message, args: &[String]) -> Result<()> {
        self.bot
            .reply_to(message, &format!("Hey there, {}!", args.join(" ")))
            .await
    }
}
