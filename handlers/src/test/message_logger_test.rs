//! Unit tests for the message_logger module.

use std::sync::Arc;

use botx_core::{BotHandle, Handler, HandlerResponse, Module};

use super::{sample_message, RecordingBot};
use crate::{MessageLogger, MessageLoggerModule};

#[tokio::test]
async fn test_logger_before_continues() {
    for debug in [false, true] {
        let h = MessageLogger::new(debug);
        assert!(h.before(&sample_message("hello")).await.unwrap());
    }
}

#[tokio::test]
async fn test_logger_leaves_handle_phase_alone() {
    let h = MessageLogger::new(false);
    let result = h.handle(&sample_message("/hello")).await.unwrap();
    assert_eq!(result, HandlerResponse::Continue);
}

#[test]
fn test_module_registers_message_handler() {
    let mut handle = BotHandle::new(Arc::new(RecordingBot::default()));

    MessageLoggerModule::new(true).init(&mut handle).unwrap();

    assert_eq!(handle.handler_count(), 1);
    assert!(handle.command_names().is_empty());
}
