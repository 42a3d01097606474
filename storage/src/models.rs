//! Persisted records: the per-user metadata file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// When and from where a user registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Unix timestamp in seconds with fractional part.
    pub ts: f64,
    /// Same instant, RFC 3339.
    pub time: DateTime<Utc>,
    /// Game or module the registration came from, if any.
    pub source: Option<String>,
}

impl Registration {
    pub fn now(source: Option<&str>) -> Self {
        let time = Utc::now();
        Self {
            ts: time.timestamp_micros() as f64 / 1_000_000.0,
            time,
            source: source.map(str::to_string),
        }
    }
}

/// Top-level keys of `meta.json` owned by the store; `meta_set` refuses them.
pub const RESERVED_META_KEYS: [&str; 2] = ["external_id", "registration"];

/// Contents of `<slot>/meta.json`. Keys written through `meta_set` land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMeta {
    pub external_id: String,
    pub registration: Registration,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserMeta {
    pub fn new(external_id: &str, source: Option<&str>) -> Self {
        Self {
            external_id: external_id.to_string(),
            registration: Registration::now(source),
            extra: Map::new(),
        }
    }

    /// Value of a key set through `meta_set`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
