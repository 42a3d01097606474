//! Unit tests for llm_api and the built-in registration list.

use std::sync::Arc;

use await_selection::SelectionRegistry;
use botx_core::{BotHandle, Module};
use llm_client::LlmConfigLoader;
use llm_handlers::AggregatorOptions;
use module_loader::ModuleLoader;
use serde_json::json;
use storage::UserManager;

use super::RecordingBot;
use crate::{builtin_modules, BuiltinContext, LlmApiModule};

fn loader_from(value: serde_json::Value) -> Arc<LlmConfigLoader> {
    match value {
        serde_json::Value::Object(map) => Arc::new(LlmConfigLoader::from_map(map)),
        _ => panic!("expected object"),
    }
}

#[test]
fn test_llm_api_without_config_registers_gpt() {
    let mut handle = BotHandle::new(Arc::new(RecordingBot::default()));
    let module = LlmApiModule::new(loader_from(json!({})), AggregatorOptions::default());

    module.init(&mut handle).unwrap();

    assert!(handle.has_command("gpt"));
}

#[test]
fn test_llm_api_with_unusable_proxy_fails_init() {
    let mut handle = BotHandle::new(Arc::new(RecordingBot::default()));
    let config = loader_from(json!({
        "gpt-4": { "api_key": "sk-test-0123456789", "proxy": "not a url" }
    }));

    let result = LlmApiModule::new(config, AggregatorOptions::default()).init(&mut handle);

    assert!(result.is_err());
    assert!(!handle.has_command("gpt"));
}

#[tokio::test]
async fn test_builtin_modules_all_load() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = BuiltinContext {
        debug: false,
        llm_config: loader_from(json!({})),
        aggregator: AggregatorOptions::default(),
        store: Arc::new(UserManager::open(dir.path()).await.unwrap()),
        selections: Arc::new(SelectionRegistry::new()),
    };
    let loader = builtin_modules(ctx)
        .into_iter()
        .fold(ModuleLoader::new(), |loader, entry| loader.register(entry));
    let mut handle = BotHandle::new(Arc::new(RecordingBot::default()));

    let report = loader.load(&mut handle);

    assert_eq!(
        report.loaded,
        vec![
            "hello_world".to_string(),
            "message_logger".to_string(),
            "llm_api".to_string()
        ]
    );
    assert_eq!(
        handle.command_names(),
        vec!["gpt".to_string(), "hello".to_string(), "hi".to_string()]
    );
    assert_eq!(handle.handler_count(), 1);
}
