//! In-memory settings store.

use crate::config::SettingValue;
use dashmap::DashMap;
use std::collections::HashMap;

/// Concurrent key/value settings, seeded from config and updatable at runtime.
#[derive(Debug, Default)]
pub struct SettingsStore {
    values: DashMap<String, SettingValue>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from the `[settings]` config table.
    pub fn from_config(settings: &HashMap<String, SettingValue>) -> Self {
        let values = settings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).map(|v| v.value().clone())
    }

    pub fn set(&self, key: &str, value: SettingValue) {
        self.values.insert(key.to_string(), value);
    }

    /// True only when the setting exists and is the boolean `true`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// True when the setting exists and is truthy (`true`, non-zero, non-empty).
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.is_truthy())
    }
}

impl From<&SettingValue> for serde_json::Value {
    fn from(value: &SettingValue) -> Self {
        match value {
            SettingValue::Bool(b) => serde_json::Value::Bool(*b),
            SettingValue::Int(i) => serde_json::Value::from(*i),
            SettingValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_bool_is_strict() {
        let mut seed = HashMap::new();
        seed.insert("E2E_Enable".to_string(), SettingValue::Bool(true));
        seed.insert("UI_Use_Real_Name".to_string(), SettingValue::Text("true".into()));
        seed.insert("Flag".to_string(), SettingValue::Int(1));
        let store = SettingsStore::from_config(&seed);

        assert!(store.get_bool("E2E_Enable"));
        assert!(!store.get_bool("UI_Use_Real_Name"));
        assert!(!store.get_bool("Flag"));
        assert!(!store.get_bool("Missing"));

        store.set("E2E_Enable", SettingValue::Bool(false));
        assert!(!store.get_bool("E2E_Enable"));
    }

    #[test]
    fn test_is_truthy_is_loose() {
        let store = SettingsStore::new();
        assert!(!store.is_truthy("UI_Use_Real_Name"));

        store.set("UI_Use_Real_Name", SettingValue::Int(1));
        assert!(store.is_truthy("UI_Use_Real_Name"));
        store.set("UI_Use_Real_Name", SettingValue::Text("yes".into()));
        assert!(store.is_truthy("UI_Use_Real_Name"));
        store.set("UI_Use_Real_Name", SettingValue::Int(0));
        assert!(!store.is_truthy("UI_Use_Real_Name"));
        store.set("UI_Use_Real_Name", SettingValue::Text(String::new()));
        assert!(!store.is_truthy("UI_Use_Real_Name"));
    }
}
