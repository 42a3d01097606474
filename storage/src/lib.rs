//! Storage crate: the user registry and the per-user game data store.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserMeta, Registration
//! - [`layout`] – Directory layout, backup naming, id validation
//! - [`user_manager`] – UserManager (register, data get/set/delete, metadata)

mod error;
pub mod layout;
mod models;
mod user_manager;

pub use error::{Result, StorageError};
pub use models::{Registration, UserMeta, RESERVED_META_KEYS};
pub use user_manager::UserManager;
