use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotxError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Module error: {0}")]
    Module(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, BotxError>;
