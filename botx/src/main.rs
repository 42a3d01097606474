//! botx CLI: run the bot, or list the registered modules. Config from env and optional CLI args.

use anyhow::Result;
use botx::config::enabled_modules_from_env;
use botx::{run, BotConfig, Cli, Commands};
use clap::Parser;
use handlers::BUILTIN_MODULES;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run(config).await
        }
        Commands::Modules => {
            list_modules();
            Ok(())
        }
    }
}

fn list_modules() {
    let enabled = enabled_modules_from_env();
    for name in BUILTIN_MODULES {
        let on = enabled
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == name));
        println!("{} {}", if on { "[x]" } else { "[ ]" }, name);
    }
    if let Some(names) = &enabled {
        for unknown in names.iter().filter(|n| !BUILTIN_MODULES.contains(&n.as_str())) {
            println!("[?] {} (not registered)", unknown);
        }
    }
}
