// src/core/builder.rs

//! Builds the typed command tree from a parsed configuration mapping.
//!
//! Structure is strict: a `commands` value must be a list of mappings and
//! every entry needs a `name`, otherwise the whole build fails. Leaf
//! declarations (`args`, `flags`, `environment_variables`) are lenient:
//! malformed entries are dropped and the build carries on.

use std::path::Path;
use thiserror::Error;

use crate::constants::{DEFAULT_ROOT_NAME, ROOT_ACTION_NAME};
use crate::core::value::{ConfigMap, ConfigValue};
use crate::models::{Arg, Command, EnvVar, Flag};
use crate::settings::Settings;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{owner}.commands must be a list (found {found})")]
    CommandsNotList { owner: String, found: &'static str },
    #[error("{owner}: commands[{index}] must be a mapping")]
    EntryNotMapping { owner: String, index: usize },
    #[error("{owner}: commands[{index}].name is required")]
    MissingName { owner: String, index: usize },
}

type BuildResult<T> = Result<T, BuildError>;

/// Builds the command tree rooted at `config`.
pub fn build(config: &ConfigMap, settings: &Settings) -> BuildResult<Command> {
    let name = string_key(config, "name")
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_ROOT_NAME)
        .to_string();

    let filename = match &settings.commands_dir {
        Some(dir) => join_path(dir, &format!("root.{}", settings.extension())),
        None => format!("root_command.{}", settings.extension()),
    };

    let mut root = Command {
        parents: Vec::new(),
        full_name: name.clone(),
        action_name: ROOT_ACTION_NAME.to_string(),
        alias: normalize_alias(config.get("alias"), &name),
        filename,
        ..declarations(config, name)
    };

    root.commands = build_children(config, &[], &root.name, &root.full_name, settings)?;
    log::debug!(
        "Built command tree '{}' with {} commands",
        root.full_name,
        root.deep_commands(true).len()
    );
    Ok(root)
}

/// Builds the children declared under `owner`'s `commands` key. `parents` is
/// the owner's own parent chain.
fn build_children(
    owner: &ConfigMap,
    parents: &[String],
    owner_name: &str,
    owner_full_name: &str,
    settings: &Settings,
) -> BuildResult<Vec<Command>> {
    let Some(raw) = owner.get("commands") else {
        return Ok(Vec::new());
    };
    let entries = raw.as_sequence().ok_or_else(|| BuildError::CommandsNotList {
        owner: owner_full_name.to_string(),
        found: raw.kind(),
    })?;

    let mut chain = parents.to_vec();
    chain.push(owner_name.to_string());

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| build_command(entry, index, chain.clone(), owner_full_name, settings))
        .collect()
}

fn build_command(
    entry: &ConfigValue,
    index: usize,
    parents: Vec<String>,
    owner_full_name: &str,
    settings: &Settings,
) -> BuildResult<Command> {
    let opts = entry.as_mapping().ok_or_else(|| BuildError::EntryNotMapping {
        owner: owner_full_name.to_string(),
        index,
    })?;

    let name = string_key(opts, "name")
        .filter(|n| !n.is_empty())
        .ok_or_else(|| BuildError::MissingName {
            owner: owner_full_name.to_string(),
            index,
        })?
        .to_string();

    let full_name = parents
        .iter()
        .chain(std::iter::once(&name))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let action_name = compute_action_name(&parents, &name);
    let filename = resolve_filename(opts, &action_name, settings);

    let mut command = Command {
        full_name,
        private: opts.get("private").and_then(ConfigValue::as_bool).unwrap_or(false),
        expose: string_key(opts, "expose")
            .filter(|e| !e.is_empty())
            .map(str::to_string),
        alias: normalize_alias(opts.get("alias"), &name),
        filename,
        action_name,
        ..declarations(opts, name)
    };

    command.commands =
        build_children(opts, &parents, &command.name, &command.full_name, settings)?;
    command.parents = parents;
    Ok(command)
}

/// The name-independent part shared by root and child construction.
fn declarations(opts: &ConfigMap, name: String) -> Command {
    Command {
        name,
        description: string_key(opts, "description").unwrap_or_default().to_string(),
        args: parse_args(opts.get("args")),
        flags: parse_flags(opts.get("flags")),
        env_vars: parse_env_vars(opts.get("environment_variables")),
        ..Default::default()
    }
}

/// Root is `root`; a direct child is its own name; deeper commands drop the
/// root from the chain and join the rest with spaces.
pub fn compute_action_name(parents: &[String], name: &str) -> String {
    match parents {
        [] => ROOT_ACTION_NAME.to_string(),
        [_root] => name.to_string(),
        [_root, rest @ ..] => {
            let mut parts: Vec<&str> = rest.iter().map(String::as_str).collect();
            parts.push(name);
            parts.join(" ")
        }
    }
}

/// `[name]` followed by the declared aliases (a single string or a list).
pub fn normalize_alias(value: Option<&ConfigValue>, name: &str) -> Vec<String> {
    let mut out = vec![name.to_string()];
    match value {
        Some(ConfigValue::String(s)) if !s.is_empty() => out.push(s.clone()),
        Some(ConfigValue::Sequence(items)) => out.extend(
            items
                .iter()
                .filter_map(ConfigValue::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        ),
        _ => {}
    }
    out
}

/// Explicit `filename` wins; otherwise the action name is mapped either into
/// `commands_dir` or onto a flat `<action>_command.<ext>` name.
pub fn resolve_filename(opts: &ConfigMap, action_name: &str, settings: &Settings) -> String {
    if let Some(explicit) = string_key(opts, "filename").filter(|f| !f.is_empty()) {
        return explicit.to_string();
    }

    let ext = settings.extension();
    match &settings.commands_dir {
        Some(dir) => {
            let relative = action_name.split(' ').collect::<Vec<_>>().join("/");
            join_path(dir, &format!("{}.{}", relative, ext))
        }
        None => format!("{}_command.{}", underscore(&action_name.replace(' ', "_")), ext),
    }
}

fn underscore(s: &str) -> String {
    s.trim().replace(['-', '/'], "_").to_lowercase()
}

fn join_path(dir: &str, relative: &str) -> String {
    Path::new(dir).join(relative).to_string_lossy().into_owned()
}

fn string_key<'a>(map: &'a ConfigMap, key: &str) -> Option<&'a str> {
    map.get(key).and_then(ConfigValue::as_str)
}

// --- LENIENT LEAF PARSING ---

fn parse_args(value: Option<&ConfigValue>) -> Vec<Arg> {
    entries(value)
        .filter_map(|m| {
            let name = string_key(m, "name").filter(|n| !n.is_empty());
            if name.is_none() {
                log::debug!("Skipping arg entry without a name");
            }
            Some(Arg {
                name: name?.to_string(),
                required: bool_key(m, "required"),
            })
        })
        .collect()
}

fn parse_flags(value: Option<&ConfigValue>) -> Vec<Flag> {
    entries(value)
        .map(|m| Flag {
            long: string_key(m, "long").filter(|s| !s.is_empty()).map(str::to_string),
            short: string_key(m, "short").filter(|s| !s.is_empty()).map(str::to_string),
            required: bool_key(m, "required"),
            allowed: m
                .get("allowed")
                .and_then(ConfigValue::as_sequence)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(ConfigValue::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            private: bool_key(m, "private"),
        })
        .collect()
}

fn parse_env_vars(value: Option<&ConfigValue>) -> Vec<EnvVar> {
    entries(value)
        .filter_map(|m| {
            let name = string_key(m, "name").filter(|n| !n.is_empty());
            if name.is_none() {
                log::debug!("Skipping environment variable entry without a name");
            }
            Some(EnvVar {
                name: name?.to_string(),
                private: bool_key(m, "private"),
            })
        })
        .collect()
}

/// Mapping-shaped items of a declaration list; anything else yields nothing.
fn entries(value: Option<&ConfigValue>) -> impl Iterator<Item = &ConfigMap> {
    value
        .and_then(ConfigValue::as_sequence)
        .unwrap_or_default()
        .iter()
        .filter_map(|item| {
            let map = item.as_mapping();
            if map.is_none() {
                log::debug!("Skipping non-mapping declaration ({})", item.kind());
            }
            map
        })
}

fn bool_key(map: &ConfigMap, key: &str) -> bool {
    map.get(key).and_then(ConfigValue::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> ConfigMap {
        match ConfigValue::from_yaml_str(yaml).unwrap() {
            ConfigValue::Mapping(map) => map,
            other => panic!("expected mapping, got {}", other.kind()),
        }
    }

    fn flat() -> Settings {
        Settings::default()
    }

    fn with_commands_dir(dir: &str) -> Settings {
        Settings {
            commands_dir: Some(dir.to_string()),
            ..Settings::default()
        }
    }

    const NESTED: &str = r#"
name: cli
description: Sample application
commands:
  - name: download
    alias: d
    commands:
      - name: file-list
        alias: [fl, "", 3]
  - name: upload
    private: true
    expose: always
"#;

    #[test]
    fn root_defaults() {
        let root = build(&config("description: x\n"), &flat()).unwrap();

        assert_eq!(root.name, "root");
        assert_eq!(root.full_name, "root");
        assert_eq!(root.action_name, "root");
        assert_eq!(root.alias, ["root"]);
        assert_eq!(root.filename, "root_command.sh");
        assert!(root.parents.is_empty());
        assert!(root.commands.is_empty());
    }

    #[test]
    fn root_filename_in_commands_dir() {
        let root = build(&config("name: cli\n"), &with_commands_dir("commands")).unwrap();
        assert_eq!(root.filename, "commands/root.sh");
    }

    #[test]
    fn identity_is_derived_from_parents() {
        let root = build(&config(NESTED), &flat()).unwrap();
        let download = &root.commands[0];
        let file_list = &download.commands[0];

        assert_eq!(download.parents, ["cli"]);
        assert_eq!(download.full_name, "cli download");
        assert_eq!(download.action_name, "download");

        assert_eq!(file_list.parents, ["cli", "download"]);
        assert_eq!(file_list.full_name, "cli download file-list");
        assert_eq!(file_list.action_name, "download file-list");
    }

    #[test]
    fn aliases_always_start_with_name() {
        let root = build(&config(NESTED), &flat()).unwrap();
        for cmd in root.deep_commands(true) {
            assert_eq!(cmd.alias[0], cmd.name);
        }
        assert_eq!(root.commands[0].alias, ["download", "d"]);
        assert_eq!(root.commands[0].commands[0].alias, ["file-list", "fl"]);
        assert_eq!(root.commands[1].alias, ["upload"]);
    }

    #[test]
    fn flat_filenames_are_underscored() {
        let root = build(&config(NESTED), &flat()).unwrap();
        assert_eq!(root.commands[0].filename, "download_command.sh");
        assert_eq!(
            root.commands[0].commands[0].filename,
            "download_file_list_command.sh"
        );
    }

    #[test]
    fn nested_filenames_follow_action_path() {
        let mut settings = with_commands_dir("commands");
        settings.partials_extension = "bash".into();
        let root = build(&config(NESTED), &settings).unwrap();

        assert_eq!(root.filename, "commands/root.bash");
        assert_eq!(root.commands[0].filename, "commands/download.bash");
        assert_eq!(
            root.commands[0].commands[0].filename,
            "commands/download/file-list.bash"
        );
    }

    #[test]
    fn explicit_filename_wins() {
        let cfg = config("commands:\n  - name: Build-All\n    filename: custom/build.sh\n");
        let root = build(&cfg, &with_commands_dir("commands")).unwrap();
        assert_eq!(root.commands[0].filename, "custom/build.sh");

        let cfg = config("commands:\n  - name: Build-All\n");
        let root = build(&cfg, &flat()).unwrap();
        assert_eq!(root.commands[0].filename, "build_all_command.sh");
    }

    #[test]
    fn private_and_expose_pass_through() {
        let root = build(&config(NESTED), &flat()).unwrap();
        let upload = &root.commands[1];
        assert!(upload.private);
        assert_eq!(upload.expose.as_deref(), Some("always"));
        assert!(!root.commands[0].private);
        assert_eq!(root.commands[0].expose, None);
    }

    #[test]
    fn missing_name_reports_index() {
        let cfg = config("commands:\n  - name: ok\n  - description: nameless\n");
        let err = build(&cfg, &flat()).unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingName {
                owner: "root".into(),
                index: 1
            }
        );
        assert_eq!(err.to_string(), "root: commands[1].name is required");
    }

    #[test]
    fn nested_structural_errors_abort_the_build() {
        let cfg = config("name: cli\ncommands:\n  - name: a\n    commands: nope\n");
        let err = build(&cfg, &flat()).unwrap_err();
        assert_eq!(
            err,
            BuildError::CommandsNotList {
                owner: "cli a".into(),
                found: "string"
            }
        );

        let cfg = config("commands:\n  - just-a-string\n");
        let err = build(&cfg, &flat()).unwrap_err();
        assert!(matches!(err, BuildError::EntryNotMapping { index: 0, .. }));
    }

    #[test]
    fn null_commands_is_not_a_list() {
        let err = build(&config("commands:\n"), &flat()).unwrap_err();
        assert!(matches!(err, BuildError::CommandsNotList { found: "null", .. }));
    }

    #[test]
    fn leaf_declarations_are_lenient() {
        let cfg = config(
            r#"
args:
  - name: source
    required: true
  - required: true
  - plain-string
  - name: target
flags:
  - long: --out
    short: -o
    allowed: [a, b, 7]
    required: true
  - not-a-mapping
  - short: -v
    private: true
environment_variables:
  - name: API_KEY
    private: true
  - private: false
"#,
        );
        let root = build(&cfg, &flat()).unwrap();

        assert_eq!(
            root.args,
            [
                Arg { name: "source".into(), required: true },
                Arg { name: "target".into(), required: false },
            ]
        );
        assert_eq!(root.flags.len(), 2);
        assert_eq!(root.flags[0].long.as_deref(), Some("--out"));
        assert_eq!(root.flags[0].short.as_deref(), Some("-o"));
        assert_eq!(root.flags[0].allowed, ["a", "b"]);
        assert!(root.flags[0].required);
        assert_eq!(root.flags[1].long, None);
        assert!(root.flags[1].private);
        assert_eq!(
            root.env_vars,
            [EnvVar { name: "API_KEY".into(), private: true }]
        );
    }

    #[test]
    fn non_list_declarations_yield_nothing() {
        let root = build(&config("args: source\nflags: {long: --x}\n"), &flat()).unwrap();
        assert!(root.args.is_empty());
        assert!(root.flags.is_empty());
    }

    #[test]
    fn depth_first_visits_declaration_order() {
        let root = build(&config(NESTED), &flat()).unwrap();
        let names: Vec<_> = root
            .deep_commands(true)
            .iter()
            .map(|c| c.full_name.as_str())
            .collect();
        assert_eq!(
            names,
            ["cli", "cli download", "cli download file-list", "cli upload"]
        );
    }

    #[test]
    fn action_name_rules() {
        assert_eq!(compute_action_name(&[], "x"), "root");
        assert_eq!(compute_action_name(&["cli".into()], "c"), "c");
        assert_eq!(compute_action_name(&["cli".into(), "c".into()], "g"), "c g");
    }
}
