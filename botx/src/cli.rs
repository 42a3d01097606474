//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "botx")]
#[command(about = "Chat bot plugin host", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// List the registered modules and whether BOTX_MODULES enables them.
    Modules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_token() {
        let cli = Cli::try_parse_from(["botx", "run", "--token", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { token: Some(ref t) } if t == "abc"));
    }

    #[test]
    fn test_parse_modules() {
        let cli = Cli::try_parse_from(["botx", "modules"]).unwrap();
        assert!(matches!(cli.command, Commands::Modules));
    }
}
