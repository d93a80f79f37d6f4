// src/core/value.rs

//! Untyped configuration values.
//!
//! The command tree builder walks whatever the YAML loader produced. Instead of
//! passing `serde_yaml_ng::Value` around, the loader converts it once into this
//! closed enum so every accessor is a total function: a type mismatch answers
//! `None` and the caller decides whether that is an error or just an absent key.

use std::collections::BTreeMap;

/// A mapping node. Keys are always strings once converted.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<ConfigValue>),
    Mapping(ConfigMap),
}

impl ConfigValue {
    /// Parses YAML text straight into a `ConfigValue`.
    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml_ng::Error> {
        let raw: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
        Ok(raw.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Sequence(_) => "sequence",
            ConfigValue::Mapping(_) => "mapping",
        }
    }
}

impl From<serde_yaml_ng::Value> for ConfigValue {
    fn from(value: serde_yaml_ng::Value) -> Self {
        use serde_yaml_ng::Value as Yaml;

        match value {
            Yaml::Null => ConfigValue::Null,
            Yaml::Bool(b) => ConfigValue::Bool(b),
            Yaml::Number(n) => ConfigValue::Number(n.as_f64().unwrap_or_default()),
            Yaml::String(s) => ConfigValue::String(s),
            Yaml::Sequence(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            Yaml::Mapping(mapping) => {
                let mut map = ConfigMap::new();
                for (key, value) in mapping {
                    match mapping_key(key) {
                        Some(key) => {
                            map.insert(key, value.into());
                        }
                        None => log::debug!("Dropping mapping entry with a non-scalar key"),
                    }
                }
                ConfigValue::Mapping(map)
            }
            Yaml::Tagged(tagged) => tagged.value.into(),
        }
    }
}

fn mapping_key(key: serde_yaml_ng::Value) -> Option<String> {
    use serde_yaml_ng::Value as Yaml;

    match key {
        Yaml::String(s) => Some(s),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Tagged(tagged) => mapping_key(tagged.value),
        _ => None,
    }
}
