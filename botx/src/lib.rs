//! # botx
//!
//! Binary support: CLI parsing, env configuration, and startup wiring.

pub mod app;
pub mod cli;
pub mod config;

pub use app::{build_app, module_loader, run, App};
pub use cli::{Cli, Commands};
pub use config::BotConfig;
