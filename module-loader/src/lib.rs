//! # module-loader
//!
//! Modules are compiled in and listed explicitly: each [`ModuleEntry`] pairs a name with a factory
//! that builds the module (the "import" step). [`ModuleLoader::load`] builds and initializes every
//! entry in registration order. A failing factory or `init` is logged and recorded in the
//! [`LoadReport`]; it never stops the remaining modules from loading.

use std::collections::HashSet;

use botx_core::{BotHandle, Module};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why a module did not load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleLoadError {
    #[error("failed to build module: {0}")]
    Import(String),
    #[error("module has no init entry point: {0}")]
    MissingEntryPoint(String),
    #[error("init failed: {0}")]
    Init(String),
}

/// Builds a module instance. Called once per load.
pub type ModuleFactory = Box<dyn Fn() -> Result<Box<dyn Module>, ModuleLoadError> + Send + Sync>;

/// One registered module.
pub struct ModuleEntry {
    name: String,
    factory: ModuleFactory,
}

impl ModuleEntry {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Module>, ModuleLoadError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Box::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Result of one [`ModuleLoader::load`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Modules whose init succeeded, in load order.
    pub loaded: Vec<String>,
    /// Names that were asked for but are not registered, plus registered modules left out by the enable-list.
    pub skipped: Vec<String>,
    /// Modules that failed to build or init.
    pub failed: Vec<(String, ModuleLoadError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ordered list of module entries plus an optional enable-list.
#[derive(Default)]
pub struct ModuleLoader {
    entries: Vec<ModuleEntry>,
    enabled: Option<Vec<String>>,
}

impl ModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Later entries with a name already registered are ignored with a warning.
    pub fn register(mut self, entry: ModuleEntry) -> Self {
        if self.entries.iter().any(|e| e.name == entry.name) {
            warn!(module = %entry.name, "Module registered twice, keeping the first entry");
        } else {
            self.entries.push(entry);
        }
        self
    }

    /// Restricts loading to `names`. Order of loading stays the registration order.
    pub fn enable_only(mut self, names: Vec<String>) -> Self {
        self.enabled = Some(names);
        self
    }

    /// Registered module names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Builds and initializes every enabled module against `handle`.
    #[instrument(skip_all, fields(modules = self.entries.len()))]
    pub fn load(&self, handle: &mut BotHandle) -> LoadReport {
        let mut report = LoadReport::default();

        let enabled: Option<HashSet<&str>> = self
            .enabled
            .as_ref()
            .map(|names| names.iter().map(String::as_str).collect());

        if let Some(enabled) = &enabled {
            let mut unknown: Vec<&str> = enabled
                .iter()
                .copied()
                .filter(|name| !self.entries.iter().any(|e| e.name == *name))
                .collect();
            unknown.sort_unstable();
            for name in unknown {
                warn!(module = %name, "Skipping {}: no such module is registered", name);
                report.skipped.push(name.to_string());
            }
        }

        for entry in &self.entries {
            if let Some(enabled) = &enabled {
                if !enabled.contains(entry.name.as_str()) {
                    info!(module = %entry.name, "Module not enabled, skipped");
                    report.skipped.push(entry.name.clone());
                    continue;
                }
            }

            let module = match (entry.factory)() {
                Ok(module) => module,
                Err(e) => {
                    warn!(module = %entry.name, error = %e, "Failed to import module");
                    report.failed.push((entry.name.clone(), e));
                    continue;
                }
            };

            if let Err(e) = module.init(handle) {
                warn!(module = %entry.name, error = %e, "Cannot run init() of module");
                report
                    .failed
                    .push((entry.name.clone(), ModuleLoadError::Init(e.to_string())));
                continue;
            }

            info!(module = %entry.name, "Loaded module");
            report.loaded.push(entry.name.clone());
        }

        info!(
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Module loading finished"
        );
        report
    }
}
