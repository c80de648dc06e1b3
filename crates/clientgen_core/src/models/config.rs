//! Open-schema engine configuration.
//!
//! The console does not know the engine's option set ahead of time: option
//! names come from whatever the edit surface declares or the server returns.
//! Values are restricted to the three scalar kinds the engine accepts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Largest integer magnitude an `f64` represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// A single option value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    /// Truthiness used when a value lands on a checkbox-style field.
    pub fn is_truthy(&self) -> bool {
        match self {
            ConfigValue::Bool(b) => *b,
            ConfigValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ConfigValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

// Integral numbers go out as JSON integers; the engine decodes worker
// counts and intervals into integer fields and rejects `4.0`.
impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT => {
                serializer.serialize_i64(*n as i64)
            }
            ConfigValue::Number(n) => serializer.serialize_f64(*n),
            ConfigValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

/// Mapping from option name to value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(BTreeMap<String, ConfigValue>);

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ConfigValue)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Config {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mixed_scalar_mapping() {
        let config: Config = serde_json::from_str(
            r#"{"Iface": "ens1f0np0", "NumTXWorkers": 4, "TimeoutSec": 1.5, "DebugPrint": false}"#,
        )
        .unwrap();

        assert_eq!(config.len(), 4);
        assert_eq!(config.get("Iface").and_then(ConfigValue::as_str), Some("ens1f0np0"));
        assert_eq!(config.get("NumTXWorkers").and_then(ConfigValue::as_f64), Some(4.0));
        assert_eq!(config.get("TimeoutSec").and_then(ConfigValue::as_f64), Some(1.5));
        assert_eq!(config.get("DebugPrint").and_then(ConfigValue::as_bool), Some(false));
    }

    #[test]
    fn rejects_nested_values() {
        assert!(serde_json::from_str::<Config>(r#"{"a": {"b": 1}}"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"{"a": null}"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn integral_numbers_serialize_without_fraction() {
        let mut config = Config::new();
        config.insert("NumRXWorkers", 4.0);
        config.insert("TimeoutSec", 0.25);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"NumRXWorkers":4,"TimeoutSec":0.25}"#);
    }

    #[test]
    fn truthiness_follows_value_kind() {
        assert!(ConfigValue::Number(2.0).is_truthy());
        assert!(!ConfigValue::Number(0.0).is_truthy());
        assert!(!ConfigValue::Text(String::new()).is_truthy());
        assert!(ConfigValue::Text("x".into()).is_truthy());
    }

    #[test]
    fn display_matches_field_text() {
        assert_eq!(ConfigValue::Number(4.0).to_string(), "4");
        assert_eq!(ConfigValue::Number(0.5).to_string(), "0.5");
        assert_eq!(ConfigValue::Bool(true).to_string(), "true");
    }
}
