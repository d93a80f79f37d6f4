// src/settings.rs

//! Effective settings for one working directory.
//!
//! Layers, later wins: built-in defaults, the user settings file, `BASHLY_*`
//! environment variables, per-environment keys from the file (`<key>_<env>`),
//! and finally the environment variables again so they stay the last word.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    DEFAULT_PARTIALS_EXTENSION, SETTINGS_FILENAMES, SETTINGS_PATH_ENV, SOURCE_DIR_PLACEHOLDER,
    USER_CONFIG_DIRNAME,
};
use crate::core::value::{ConfigMap, ConfigValue};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse settings file '{path}': {source}")]
    YamlParse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
    #[error("settings root in '{path}' must be a YAML mapping")]
    NotMapping { path: String },
}

type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub env: String,
    pub source_dir: String,
    pub config_path: String,
    /// `None` keeps command partials flat next to the sources.
    pub commands_dir: Option<String>,
    pub partials_extension: String,
    /// Name of an environment variable whose presence reveals private items.
    pub private_reveal_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            source_dir: "src".to_string(),
            config_path: format!("{}/bashly.yml", SOURCE_DIR_PLACEHOLDER),
            commands_dir: None,
            partials_extension: DEFAULT_PARTIALS_EXTENSION.to_string(),
            private_reveal_key: String::new(),
        }
    }
}

impl Settings {
    /// Resolves settings for `workdir` against the process environment.
    pub fn load(workdir: &Path) -> SettingsResult<Self> {
        Self::load_with(workdir, |key| std::env::var(key).ok())
    }

    /// Same as [`Settings::load`] with an explicit environment lookup.
    pub fn load_with<F>(workdir: &Path, env: F) -> SettingsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        // 1. Optional user settings file.
        let user = match select_user_settings_path(workdir, &env) {
            Some(path) => {
                log::info!("Loading settings from {}", path.display());
                let map = load_yaml_map(&path)?;
                settings.apply_map(&map, "");
                Some(map)
            }
            None => {
                log::debug!("No settings file found, using defaults");
                None
            }
        };

        // 2. Environment (decides which per-env overlay applies).
        settings.apply_env(&env);

        // 3. Per-env overlay, then env vars again as final authority.
        if let Some(map) = user {
            let env_name = settings.env.trim().to_string();
            if !env_name.is_empty() {
                settings.apply_map(&map, &format!("_{}", env_name));
                settings.apply_env(&env);
            }
        }

        // 4. Interpolate config_path.
        settings.config_path = settings
            .config_path
            .replace(SOURCE_DIR_PLACEHOLDER, &settings.source_dir);

        log::debug!("Effective settings: {:?}", settings);
        Ok(settings)
    }

    /// Extension for partials, falling back to the default when blank.
    pub fn extension(&self) -> &str {
        if self.partials_extension.is_empty() {
            DEFAULT_PARTIALS_EXTENSION
        } else {
            &self.partials_extension
        }
    }

    /// Whether private commands and flags should be shown.
    pub fn reveal_private(&self) -> bool {
        self.reveal_private_with(|key| std::env::var_os(key).is_some())
    }

    pub fn reveal_private_with<F>(&self, is_set: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        let key = self.private_reveal_key.trim();
        !key.is_empty() && is_set(key)
    }

    // Applies `<key><suffix>` entries; the base pass uses an empty suffix.
    fn apply_map(&mut self, map: &ConfigMap, suffix: &str) {
        let get = |key: &str| map.get(&format!("{}{}", key, suffix));

        if suffix.is_empty()
            && let Some(v) = map.get("env").and_then(ConfigValue::as_str)
            && !v.is_empty()
        {
            self.env = v.to_string();
        }
        if let Some(v) = get("source_dir").and_then(ConfigValue::as_str) {
            self.source_dir = v.to_string();
        }
        if let Some(v) = get("config_path").and_then(ConfigValue::as_str) {
            self.config_path = v.to_string();
        }
        if let Some(v) = get("commands_dir") {
            match v {
                ConfigValue::Null => self.commands_dir = None,
                ConfigValue::String(s) => self.commands_dir = non_empty(s),
                _ => {}
            }
        }
        if let Some(v) = get("partials_extension").and_then(ConfigValue::as_str)
            && !v.is_empty()
        {
            self.partials_extension = v.to_string();
        }
        if let Some(v) = get("private_reveal_key") {
            match v {
                ConfigValue::Null => self.private_reveal_key.clear(),
                ConfigValue::String(s) => self.private_reveal_key = s.clone(),
                _ => {}
            }
        }
    }

    fn apply_env<F>(&mut self, env: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env("BASHLY_ENV").filter(|v| !v.is_empty()) {
            self.env = v;
        }
        if let Some(v) = env("BASHLY_SOURCE_DIR") {
            self.source_dir = v;
        }
        if let Some(v) = env("BASHLY_CONFIG_PATH") {
            self.config_path = v;
        }
        if let Some(v) = env("BASHLY_COMMANDS_DIR") {
            self.commands_dir = non_empty(&v);
        }
        if let Some(v) = env("BASHLY_PARTIALS_EXTENSION").filter(|v| !v.is_empty()) {
            self.partials_extension = v;
        }
        if let Some(v) = env("BASHLY_PRIVATE_REVEAL_KEY") {
            self.private_reveal_key = v;
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Picks the settings file: explicit env path, then the working directory,
/// then the user config directory.
fn select_user_settings_path<F>(workdir: &Path, env: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(p) = env(SETTINGS_PATH_ENV).filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(p));
    }
    for name in SETTINGS_FILENAMES {
        let candidate = workdir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_DIRNAME).join("settings.yml"))
        .filter(|p| p.is_file())
}

fn load_yaml_map(path: &Path) -> SettingsResult<ConfigMap> {
    let content = fs::read_to_string(path).map_err(|e| SettingsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    if content.trim().is_empty() {
        return Ok(ConfigMap::new());
    }
    let value = ConfigValue::from_yaml_str(&content).map_err(|e| SettingsError::YamlParse {
        path: path.display().to_string(),
        source: e,
    })?;
    match value {
        ConfigValue::Mapping(map) => Ok(map),
        // An empty file parses as null; treat it as "no keys".
        ConfigValue::Null => Ok(ConfigMap::new()),
        _ => Err(SettingsError::NotMapping {
            path: path.display().to_string(),
        }),
    }
}
