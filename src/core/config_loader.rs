// src/core/config_loader.rs

//! Loads the application configuration and expands `import` directives.
//!
//! A mapping holding the import keyword pulls another YAML file in. Imported
//! mappings are merged under the keys written next to the directive; an
//! imported sequence replaces the whole mapping, which is how a `commands`
//! list can live in its own file.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::value::{ConfigMap, ConfigValue};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse YAML in '{path}': {source}")]
    YamlParse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
    #[error("{keyword} must be a string path")]
    ImportNotString { keyword: String },
    #[error("cannot find import file {path}")]
    ImportNotFound { path: String },
    #[error("cannot find a valid YAML in {path}")]
    InvalidImport { path: String },
    #[error("circular import: {}", .chain.join(" -> "))]
    CircularImport { chain: Vec<String> },
    #[error("config root in '{path}' must be a YAML mapping")]
    NotMapping { path: String },
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Loads `path` (relative paths resolve against `workdir`) and composes every
/// `keyword` directive found in it. Import paths also resolve against `workdir`.
pub fn load_composed_config(path: &Path, keyword: &str, workdir: &Path) -> ConfigResult<ConfigMap> {
    let config_path = workdir.join(path);
    let display = config_path.display().to_string();
    log::info!("Loading configuration from {}", display);

    let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
        path: display.clone(),
        source: e,
    })?;
    let root = parse(&content, &display)?;

    let mut composer = Composer {
        keyword,
        workdir,
        stack: vec![canonical_or_self(&config_path)],
    };
    match composer.compose(root)? {
        ConfigValue::Mapping(map) => Ok(map),
        _ => Err(ConfigError::NotMapping { path: display }),
    }
}

struct Composer<'a> {
    keyword: &'a str,
    workdir: &'a Path,
    /// Files currently being composed, outermost first.
    stack: Vec<PathBuf>,
}

impl Composer<'_> {
    fn compose(&mut self, value: ConfigValue) -> ConfigResult<ConfigValue> {
        match value {
            ConfigValue::Mapping(map) => self.compose_map(map),
            ConfigValue::Sequence(items) => items
                .into_iter()
                .map(|item| self.compose(item))
                .collect::<ConfigResult<Vec<_>>>()
                .map(ConfigValue::Sequence),
            scalar => Ok(scalar),
        }
    }

    fn compose_map(&mut self, mut map: ConfigMap) -> ConfigResult<ConfigValue> {
        let mut result = ConfigMap::new();

        // 1. The imported content forms the base layer.
        if let Some(directive) = map.remove(self.keyword) {
            let import_path = directive
                .as_str()
                .ok_or_else(|| ConfigError::ImportNotString {
                    keyword: self.keyword.to_string(),
                })?
                .to_string();

            match self.load_import(&import_path)? {
                ConfigValue::Sequence(items) => return Ok(ConfigValue::Sequence(items)),
                ConfigValue::Mapping(imported) => result = imported,
                _ => return Err(ConfigError::InvalidImport { path: import_path }),
            }
        }

        // 2. Keys written next to the directive win.
        for (key, value) in map {
            result.insert(key, self.compose(value)?);
        }
        Ok(ConfigValue::Mapping(result))
    }

    fn load_import(&mut self, import_path: &str) -> ConfigResult<ConfigValue> {
        let resolved = self.workdir.join(import_path);
        let canonical = fs::canonicalize(&resolved).map_err(|_| ConfigError::ImportNotFound {
            path: import_path.to_string(),
        })?;

        if self.stack.contains(&canonical) {
            let mut chain: Vec<String> =
                self.stack.iter().map(|p| p.display().to_string()).collect();
            chain.push(canonical.display().to_string());
            return Err(ConfigError::CircularImport { chain });
        }

        log::debug!("Importing {}", canonical.display());
        let content = fs::read_to_string(&canonical).map_err(|_| ConfigError::ImportNotFound {
            path: import_path.to_string(),
        })?;
        let value = parse(&content, import_path)?;

        self.stack.push(canonical);
        let composed = self.compose(value);
        self.stack.pop();
        composed
    }
}

fn parse(content: &str, path: &str) -> ConfigResult<ConfigValue> {
    if content.trim().is_empty() {
        return Ok(ConfigValue::Null);
    }
    ConfigValue::from_yaml_str(content).map_err(|e| ConfigError::YamlParse {
        path: path.to_string(),
        source: e,
    })
}

fn canonical_or_self(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
