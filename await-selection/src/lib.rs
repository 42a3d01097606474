//! # await-selection
//!
//! Pending interactive prompts. A module shows a prompt with buttons, then registers the prompt's
//! message id with one callback per button value. The first click on that message resolves it:
//! the entry is removed and the matching callback (if any) runs once. [`SelectionRegistry::cancel`]
//! is the other terminal transition.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use botx_core::{BotxError, ButtonClick, ButtonHandler, Result};
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

/// One-shot callback run when its choice is clicked. Its result comes back in
/// [`SelectionOutcome::Resolved`].
pub type SelectionCallback =
    Box<dyn FnOnce(ButtonClick) -> BoxFuture<'static, Result<Value>> + Send>;

/// Choice value → callback for one prompt.
pub type Choices = HashMap<String, SelectionCallback>;

/// Boxes an async closure as a [`SelectionCallback`]. The closure may return any
/// serializable value; `()` resolves to `null`.
pub fn callback<F, Fut, T>(f: F) -> SelectionCallback
where
    F: FnOnce(ButtonClick) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Serialize + 'static,
{
    Box::new(move |click| {
        Box::pin(async move {
            let value = f(click).await?;
            serde_json::to_value(value).map_err(|e| BotxError::Unknown(e.to_string()))
        })
    })
}

/// How a click on a pending prompt was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// The callback for `choice` ran and returned `value`.
    Resolved { choice: String, value: Value },
    /// The prompt was pending but had no callback for the clicked value.
    UnknownChoice { choice: String },
    /// The callback ran and returned an error (logged, not propagated).
    CallbackFailed { choice: String, error: String },
}

/// Message id → pending choices.
#[derive(Default)]
pub struct SelectionRegistry {
    pending: Mutex<HashMap<String, Choices>>,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<String, Choices>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `choices` for `message_id`, replacing any prompt already pending there.
    pub fn add(&self, message_id: impl Into<String>, choices: Choices) {
        let message_id = message_id.into();
        debug!(message_id = %message_id, choices = choices.len(), "Selection added");
        if self.pending().insert(message_id.clone(), choices).is_some() {
            debug!(message_id = %message_id, "Replaced pending selection");
        }
    }

    /// Resolves a click.
    ///
    /// Returns `None` when no prompt is pending for the clicked message. Otherwise the entry is
    /// removed before anything runs, so a second click on the same message is a no-op.
    pub async fn callback(&self, click: &ButtonClick) -> Option<SelectionOutcome> {
        let mut choices = self.pending().remove(&click.message_id)?;

        let Some(cb) = choices.remove(&click.value) else {
            let mut known: Vec<&String> = choices.keys().collect();
            known.sort();
            warn!(
                message_id = %click.message_id,
                choice = %click.value,
                known = ?known,
                "Choice not found in pending selection"
            );
            return Some(SelectionOutcome::UnknownChoice {
                choice: click.value.clone(),
            });
        };

        match cb(click.clone()).await {
            Ok(value) => Some(SelectionOutcome::Resolved {
                choice: click.value.clone(),
                value,
            }),
            Err(e) => {
                error!(
                    message_id = %click.message_id,
                    choice = %click.value,
                    error = %e,
                    "Selection callback failed"
                );
                Some(SelectionOutcome::CallbackFailed {
                    choice: click.value.clone(),
                    error: e.to_string(),
                })
            }
        }
    }

    /// Drops the prompt for `message_id`. Returns false (and logs) when nothing was pending.
    pub fn cancel(&self, message_id: &str) -> bool {
        if self.pending().remove(message_id).is_some() {
            debug!(message_id = %message_id, "Selection cancelled");
            true
        } else {
            warn!(message_id = %message_id, "Message not found in pending selections");
            false
        }
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.pending().contains_key(message_id)
    }

    pub fn len(&self) -> usize {
        self.pending().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending().is_empty()
    }
}

/// Feeds platform button clicks into a shared [`SelectionRegistry`].
pub struct SelectionButtonHandler {
    registry: Arc<SelectionRegistry>,
}

impl SelectionButtonHandler {
    pub fn new(registry: Arc<SelectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ButtonHandler for SelectionButtonHandler {
    async fn handle(&self, click: &ButtonClick) -> Result<()> {
        if let Some(outcome) = self.registry.callback(click).await {
            debug!(outcome = ?outcome, "Button click resolved a selection");
        }
        Ok(())
    }
}
