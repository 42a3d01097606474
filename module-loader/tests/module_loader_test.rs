//! Integration tests for [`module_loader::ModuleLoader`].
//!
//! Covers: init runs once per loaded module, missing entry points and failing inits are recorded
//! without halting the remaining modules, and the enable-list (including unknown names).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use botx_core::{
    Bot, BotHandle, BotxError, Chat, CommandHandler, Message, Module, Result,
};
use module_loader::{ModuleEntry, ModuleLoadError, ModuleLoader};

struct NoopBot;

#[async_trait]
impl Bot for NoopBot {
    async fn send_message(&self, _chat: &Chat, _text: &str) -> Result<()> {
        Ok(())
    }
    async fn reply_to(&self, _message: &Message, _text: &str) -> Result<()> {
        Ok(())
    }
    async fn edit_message(&self, _chat: &Chat, _message_id: &str, _text: &str) -> Result<()> {
        Ok(())
    }
    async fn send_message_and_return_id(&self, _chat: &Chat, _text: &str) -> Result<String> {
        Ok("1".to_string())
    }
    async fn add_reaction(&self, _message: &Message, _emoji: &str) -> Result<()> {
        Ok(())
    }
    async fn delete_reaction(&self, _message: &Message, _emoji: &str) -> Result<()> {
        Ok(())
    }
}

struct NoopCommand;

#[async_trait]
impl CommandHandler for NoopCommand {
    async fn handle(&self, _message: &Message, _args: &[String]) -> Result<()> {
        Ok(())
    }
}

/// Registers one command and counts its init calls.
struct CountingModule {
    name: &'static str,
    command: &'static str,
    inits: Arc<AtomicUsize>,
}

impl Module for CountingModule {
    fn name(&self) -> &str {
        self.name
    }

    fn init(&self, handle: &mut BotHandle) -> Result<()> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        handle.command(self.command, Arc::new(NoopCommand));
        Ok(())
    }
}

struct FailingModule;

impl Module for FailingModule {
    fn name(&self) -> &str {
        "failing"
    }

    fn init(&self, _handle: &mut BotHandle) -> Result<()> {
        Err(BotxError::Module("cannot start".to_string()))
    }
}

fn counting(
    name: &'static str,
    command: &'static str,
    inits: &Arc<AtomicUsize>,
) -> ModuleEntry {
    let inits = inits.clone();
    ModuleEntry::new(name, move || {
        Ok(Box::new(CountingModule {
            name,
            command,
            inits: inits.clone(),
        }) as Box<dyn Module>)
    })
}

fn handle() -> BotHandle {
    BotHandle::new(Arc::new(NoopBot))
}

/// **Test: A valid module's init is called exactly once and its command is registered.**
#[test]
fn test_valid_module_init_called_once() {
    let inits = Arc::new(AtomicUsize::new(0));
    let loader = ModuleLoader::new().register(counting("hello_world", "hello", &inits));
    let mut handle = handle();

    let report = loader.load(&mut handle);

    assert_eq!(inits.load(Ordering::SeqCst), 1);
    assert_eq!(report.loaded, vec!["hello_world".to_string()]);
    assert!(report.is_clean());
    assert!(handle.has_command("hello"));
}

/// **Test: A module without an entry point is recorded and the next module still loads.**
#[test]
fn test_missing_entry_point_does_not_halt_loading() {
    let inits = Arc::new(AtomicUsize::new(0));
    let loader = ModuleLoader::new()
        .register(ModuleEntry::new("broken", || {
            Err(ModuleLoadError::MissingEntryPoint("broken".to_string()))
        }))
        .register(counting("good", "good", &inits));
    let mut handle = handle();

    let report = loader.load(&mut handle);

    assert_eq!(report.loaded, vec!["good".to_string()]);
    assert_eq!(
        report.failed,
        vec![(
            "broken".to_string(),
            ModuleLoadError::MissingEntryPoint("broken".to_string())
        )]
    );
    assert_eq!(inits.load(Ordering::SeqCst), 1);
    assert!(handle.has_command("good"));
}

/// **Test: init returning an error is recorded as Init; modules after it load.**
#[test]
fn test_init_failure_is_recorded() {
    let inits = Arc::new(AtomicUsize::new(0));
    let loader = ModuleLoader::new()
        .register(ModuleEntry::new("failing", || {
            Ok(Box::new(FailingModule) as Box<dyn Module>)
        }))
        .register(counting("after", "after", &inits));
    let mut handle = handle();

    let report = loader.load(&mut handle);

    assert_eq!(report.failed.len(), 1);
    let (name, err) = &report.failed[0];
    assert_eq!(name, "failing");
    assert!(matches!(err, ModuleLoadError::Init(msg) if msg.contains("cannot start")));
    assert_eq!(report.loaded, vec!["after".to_string()]);
    assert!(!report.is_clean());
}

/// **Test: Enable-list loads only listed modules; unknown names are skipped, not fatal.**
#[test]
fn test_enable_list_filters_and_skips_unknown() {
    let a = Arc::new(AtomicUsize::new(0));
    let b = Arc::new(AtomicUsize::new(0));
    let loader = ModuleLoader::new()
        .register(counting("a", "a", &a))
        .register(counting("b", "b", &b))
        .enable_only(vec!["b".to_string(), "ghost".to_string()]);
    let mut handle = handle();

    let report = loader.load(&mut handle);

    assert_eq!(a.load(Ordering::SeqCst), 0);
    assert_eq!(b.load(Ordering::SeqCst), 1);
    assert_eq!(report.loaded, vec!["b".to_string()]);
    assert!(report.skipped.contains(&"ghost".to_string()));
    assert!(report.skipped.contains(&"a".to_string()));
    assert!(!handle.has_command("a"));
}

/// **Test: Registration order is load order; duplicate names keep the first entry.**
#[test]
fn test_load_order_and_duplicate_names() {
    let first = Arc::new(AtomicUsize::new(0));
    let dup = Arc::new(AtomicUsize::new(0));
    let other = Arc::new(AtomicUsize::new(0));
    let loader = ModuleLoader::new()
        .register(counting("one", "one", &first))
        .register(counting("two", "two", &other))
        .register(counting("one", "dup", &dup));

    assert_eq!(loader.names(), vec!["one", "two"]);

    let mut handle = handle();
    let report = loader.load(&mut handle);

    assert_eq!(report.loaded, vec!["one".to_string(), "two".to_string()]);
    assert_eq!(dup.load(Ordering::SeqCst), 0);
    assert!(!handle.has_command("dup"));
}
