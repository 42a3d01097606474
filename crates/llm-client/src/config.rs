//! LLM configuration: a JSON object keyed by model name, plus a default proxy.
//!
//! ```json
//! {
//!   "proxy": "http://127.0.0.1:7890",
//!   "gpt-4": { "api_key": "sk-...", "model": "gpt-4-turbo-preview", "temperature": 0.3 }
//! }
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const DEFAULT_LLM_CONFIG_FILE: &str = "config/llm.json";

/// Environment variables consulted for the default proxy, in priority order.
pub const PROXY_ENV_VARS: [&str; 5] = ["BOTX_PROXY", "ALL_PROXY", "all_proxy", "HTTP_PROXY", "http_proxy"];

/// First non-empty proxy from [`PROXY_ENV_VARS`].
pub fn proxy_from_env() -> Option<String> {
    PROXY_ENV_VARS
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|v| !v.trim().is_empty())
}

/// Per-model configuration. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Loaded LLM config file.
#[derive(Debug, Clone, Default)]
pub struct LlmConfigLoader {
    path: Option<PathBuf>,
    entries: Map<String, Value>,
    default_proxy: Option<String>,
}

impl LlmConfigLoader {
    /// Reads `path`. A missing or malformed file yields an empty config and a warning.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading LLM config file");

        let entries = match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    warn!(path = %path.display(), "LLM config file is not a JSON object, ignoring it");
                    Map::new()
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Error loading LLM config file, please check your JSON formatting"
                    );
                    Map::new()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error loading LLM config file");
                Map::new()
            }
        };

        let mut loader = Self::from_map(entries);
        loader.path = Some(path.to_path_buf());
        loader
    }

    /// Builds a loader from an in-memory object. The default proxy is resolved the same way as in [`Self::load`].
    pub fn from_map(entries: Map<String, Value>) -> Self {
        let default_proxy = entries
            .get("proxy")
            .and_then(Value::as_str)
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string)
            .or_else(proxy_from_env);
        Self {
            path: None,
            entries,
            default_proxy,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Config `"proxy"` key, else the first proxy env var that is set.
    pub fn default_proxy(&self) -> Option<&str> {
        self.default_proxy.as_deref()
    }

    /// Names of the model entries (every key except `proxy`).
    pub fn models(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .keys()
            .map(String::as_str)
            .filter(|k| *k != "proxy")
            .collect();
        names.sort_unstable();
        names
    }

    /// Config for `model`, with `proxy` filled from the default when the entry has none.
    pub fn get(&self, model: &str) -> Option<ModelConfig> {
        if model == "proxy" {
            return None;
        }
        let value = self.entries.get(model)?;
        let mut config: ModelConfig = match serde_json::from_value(value.clone()) {
            Ok(config) => config,
            Err(e) => {
                warn!(model = %model, error = %e, "Invalid LLM model config entry");
                return None;
            }
        };
        if config.proxy.is_none() {
            config.proxy = self.default_proxy.clone();
        }
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    fn clear_proxy_env() {
        for key in PROXY_ENV_VARS {
            env::remove_var(key);
        }
    }

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    #[serial]
    fn test_config_proxy_beats_env() {
        clear_proxy_env();
        env::set_var("ALL_PROXY", "socks5://env:1080");

        let loader = LlmConfigLoader::from_map(map(json!({ "proxy": "http://cfg:8080" })));
        assert_eq!(loader.default_proxy(), Some("http://cfg:8080"));

        clear_proxy_env();
    }

    #[test]
    #[serial]
    fn test_env_proxy_priority() {
        clear_proxy_env();
        env::set_var("http_proxy", "http://lower:1");
        env::set_var("HTTP_PROXY", "http://upper:2");
        assert_eq!(proxy_from_env().as_deref(), Some("http://upper:2"));

        env::set_var("BOTX_PROXY", "http://botx:3");
        assert_eq!(proxy_from_env().as_deref(), Some("http://botx:3"));

        clear_proxy_env();
        assert_eq!(proxy_from_env(), None);
    }

    #[test]
    #[serial]
    fn test_get_fills_proxy_only_when_absent() {
        clear_proxy_env();
        let loader = LlmConfigLoader::from_map(map(json!({
            "proxy": "http://default:1",
            "gpt-4": { "api_key": "k" },
            "local": { "api_key": "k", "proxy": "http://own:2", "endpoint": "x" }
        })));

        assert_eq!(
            loader.get("gpt-4").unwrap().proxy.as_deref(),
            Some("http://default:1")
        );
        let local = loader.get("local").unwrap();
        assert_eq!(local.proxy.as_deref(), Some("http://own:2"));
        assert_eq!(local.extra.get("endpoint"), Some(&json!("x")));
        assert_eq!(loader.get("missing"), None);
        assert_eq!(loader.get("proxy"), None);
        assert_eq!(loader.models(), vec!["gpt-4", "local"]);
    }

    #[test]
    #[serial]
    fn test_false_proxy_falls_back_to_env() {
        clear_proxy_env();
        env::set_var("BOTX_PROXY", "http://botx:3");
        let loader = LlmConfigLoader::from_map(map(json!({ "proxy": false })));
        assert_eq!(loader.default_proxy(), Some("http://botx:3"));
        clear_proxy_env();
    }
}
