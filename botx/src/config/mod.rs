//! Runtime configuration, loaded from environment variables (after `.env` via dotenvy).

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use llm_client::{proxy_from_env, DEFAULT_LLM_CONFIG_FILE};


pub const DEFAULT_LOG_FILE: &str = "logs/botx.log";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LLM_UPDATE_EVERY: usize = 5;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN, or the `--token` override
    pub bot_token: String,
    /// BOTX_DEBUG == "1"
    pub debug: bool,
    /// BOTX_PROXY / ALL_PROXY / HTTP_PROXY (and lower-case), used for the Telegram connection
    pub proxy: Option<String>,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// BOTX_DATA_DIR, root of the user registry
    pub data_dir: PathBuf,
    /// LLM_CONFIG_FILE
    pub llm_config_file: PathBuf,
    /// BOTX_MODULES, comma-separated enable-list; `None` loads every module
    pub modules: Option<Vec<String>>,
    /// LLM_UPDATE_EVERY, placeholder edit cadence in content chunks
    pub llm_update_every: usize,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    /// Call validate() after load to fail fast before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let debug = env::var("BOTX_DEBUG").map(|v| v == "1").unwrap_or(false);
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let data_dir = env::var("BOTX_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let llm_config_file =
            env::var("LLM_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_LLM_CONFIG_FILE.to_string());
        let llm_update_every = env::var("LLM_UPDATE_EVERY")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_LLM_UPDATE_EVERY);

        Ok(Self {
            bot_token,
            debug,
            proxy: proxy_from_env(),
            telegram_api_url,
            log_file,
            data_dir: PathBuf::from(data_dir),
            llm_config_file: PathBuf::from(llm_config_file),
            modules: enabled_modules_from_env(),
            llm_update_every,
        })
    }

    /// Validate config (token present, telegram_api_url a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}

/// BOTX_MODULES split on commas; blank entries dropped. Unset or blank means no restriction.
pub fn enabled_modules_from_env() -> Option<Vec<String>> {
    let raw = env::var("BOTX_MODULES").ok()?;
    let names: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}
