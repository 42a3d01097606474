//! Storage error types.
//!
//! Returned by [`crate::UserManager`]; callers (modules) decide what the user sees.

use thiserror::Error;

/// Errors that can occur when using the user registry and data store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("User {0} is already registered")]
    DuplicateUser(String),
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Data for game {game_id} not found for user {external_id}")]
    GameDataNotFound {
        external_id: String,
        game_id: String,
    },
    #[error("Data corruption: {0}")]
    DataCorruption(String),
    #[error("Backup failed: {0}")]
    Backup(String),
    #[error("Invalid game id: {0:?}")]
    InvalidGameId(String),
    #[error("Metadata key {0:?} is reserved")]
    ReservedMetaKey(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
