//! Persisted user settings.
//!
//! Settings live in a host-provided key-value store (the browser's sync
//! storage, in the original deployment). The store speaks JSON values; the
//! keys and defaults match what the companion settings surface writes:
//! `hebrewRTLEnabled` (default true) and `alignmentMode` (default smart).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resolve::AlignmentMode;

pub const ENABLED_KEY: &str = "hebrewRTLEnabled";
pub const MODE_KEY: &str = "alignmentMode";

/// Key-value persistence capability supplied by the host.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
}

/// In-memory store for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

/// The settings record as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "hebrewRTLEnabled")]
    pub enabled: bool,
    #[serde(rename = "alignmentMode")]
    pub mode: AlignmentMode,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            enabled: true,
            mode: AlignmentMode::Smart,
        }
    }
}

impl Settings {
    /// Parse a settings record from a JSON blob, e.g. a sync-storage export.
    pub fn from_json(json: &str) -> crate::error::Result<Settings> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Load settings, applying defaults for missing or malformed values.
pub fn load(store: &dyn SettingsStore) -> Settings {
    let enabled = store
        .get(ENABLED_KEY)
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    let mode = store
        .get(MODE_KEY)
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    Settings { enabled, mode }
}

/// Persist settings back to the store.
pub fn save(store: &mut dyn SettingsStore, settings: Settings) {
    store.set(ENABLED_KEY, Value::Bool(settings.enabled));
    let mode = serde_json::to_value(settings.mode).unwrap_or_else(|_| Value::String("smart".into()));
    store.set(MODE_KEY, mode);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let store = MemoryStore::new();
        let settings = load(&store);
        assert!(settings.enabled);
        assert_eq!(settings.mode, AlignmentMode::Smart);
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            enabled: false,
            mode: AlignmentMode::Force,
        };
        save(&mut store, settings);
        assert_eq!(load(&store), settings);
        assert_eq!(store.get(MODE_KEY), Some(Value::String("force".into())));
    }

    #[test]
    fn test_json_blob_round_trip() {
        let settings = Settings {
            enabled: true,
            mode: AlignmentMode::Auto,
        };
        let json = settings.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"hebrewRTLEnabled":true,"alignmentMode":"auto"}"#
        );
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_malformed_mode_falls_back() {
        let mut store = MemoryStore::new();
        store.set(MODE_KEY, Value::from(42));
        assert_eq!(load(&store).mode, AlignmentMode::Smart);

        // Unrecognized string values deserialize to the unknown mode
        store.set(MODE_KEY, Value::String("mystery".into()));
        assert_eq!(load(&store).mode, AlignmentMode::Unknown);
    }
}
