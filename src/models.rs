// src/models.rs

use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::VALIDATION_EXIT_CODE;

// --- DECLARATIONS (leaves of a command) ---

/// A positional argument declared on a command.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub name: String,
    pub required: bool,
}

/// A flag declared on a command. At least one of `long`/`short` is normally set.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Flag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    pub private: bool,
}

impl Flag {
    /// Name shown to users: the long form when present, else the short one.
    pub fn display_name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or_default()
    }
}

/// An environment variable declared on a command.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub name: String,
    pub private: bool,
}

// --- COMMAND TREE ---

/// A node of the command tree. Children are owned; there are no back-links.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    pub full_name: String,
    pub action_name: String,
    pub private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expose: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filename: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Arg>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,
    #[serde(rename = "environment_variables", skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<EnvVar>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
}

impl Command {
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Aliases other than the command's own name.
    pub fn secondary_aliases(&self) -> &[String] {
        self.alias.get(1..).unwrap_or_default()
    }

    /// True when `token` names this command, directly or through an alias.
    /// An alias ending in `*` matches any token starting with the part before it.
    pub fn matches(&self, token: &str) -> bool {
        if self.name == token {
            return true;
        }
        self.alias.iter().any(|alias| match alias.strip_suffix('*') {
            Some(prefix) => token.starts_with(prefix),
            None => alias == token,
        })
    }

    /// First direct child matching `token`, in declaration order.
    pub fn find_child(&self, token: &str) -> Option<&Command> {
        self.commands.iter().find(|child| child.matches(token))
    }

    /// All commands of the subtree in pre-order. The node itself comes first
    /// when `include_self` is set.
    pub fn deep_commands(&self, include_self: bool) -> Vec<&Command> {
        let mut out = Vec::new();
        if include_self {
            out.push(self);
        }
        for child in &self.commands {
            child.collect_deep(&mut out);
        }
        out
    }

    fn collect_deep<'a>(&'a self, out: &mut Vec<&'a Command>) {
        out.push(self);
        for child in &self.commands {
            child.collect_deep(out);
        }
    }

    pub fn visible_flags(&self, reveal_private: bool) -> Vec<&Flag> {
        self.flags
            .iter()
            .filter(|f| reveal_private || !f.private)
            .collect()
    }

    pub fn visible_env_vars(&self, reveal_private: bool) -> Vec<&EnvVar> {
        self.env_vars
            .iter()
            .filter(|e| reveal_private || !e.private)
            .collect()
    }

    /// Copy of the subtree with private commands, flags and environment
    /// variables removed, unless `reveal_private` is set.
    pub fn pruned(&self, reveal_private: bool) -> Command {
        if reveal_private {
            return self.clone();
        }
        Command {
            flags: self.flags.iter().filter(|f| !f.private).cloned().collect(),
            env_vars: self.env_vars.iter().filter(|e| !e.private).cloned().collect(),
            commands: self
                .commands
                .iter()
                .filter(|c| !c.private)
                .map(|c| c.pruned(false))
                .collect(),
            ..self.clone_header()
        }
    }

    // Everything except the child list and the leaf declarations that `pruned` rebuilds.
    fn clone_header(&self) -> Command {
        Command {
            name: self.name.clone(),
            parents: self.parents.clone(),
            full_name: self.full_name.clone(),
            action_name: self.action_name.clone(),
            private: self.private,
            expose: self.expose.clone(),
            alias: self.alias.clone(),
            filename: self.filename.clone(),
            description: self.description.clone(),
            args: self.args.clone(),
            ..Default::default()
        }
    }
}

// --- RESOLUTION AND VALIDATION RESULTS ---

/// Outcome of resolving one argument vector against a command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArgs<'a> {
    /// The resolved command, borrowed from the tree.
    pub command: &'a Command,
    /// Flag token as typed (`--name` or `-n`) to its value.
    pub flags: BTreeMap<String, String>,
    pub positional: Vec<String>,
    /// Tokens left after the command path was consumed.
    pub remaining: Vec<String>,
    pub help_asked: bool,
}

impl<'a> ParsedArgs<'a> {
    pub fn new(command: &'a Command) -> Self {
        Self {
            command,
            flags: BTreeMap::new(),
            positional: Vec::new(),
            remaining: Vec::new(),
            help_asked: false,
        }
    }

    /// Value of a flag typed under `token`, treating an empty value as absent.
    pub fn flag_value(&self, token: &str) -> Option<&str> {
        self.flags
            .get(token)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Validation verdict in the shape a thin CLI layer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub error_msg: String,
    pub exit_code: i32,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error_msg: String::new(),
            exit_code: 0,
        }
    }

    pub fn failed(error_msg: impl Into<String>) -> Self {
        Self {
            valid: false,
            error_msg: error_msg.into(),
            exit_code: VALIDATION_EXIT_CODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str, alias: &[&str]) -> Command {
        let mut all = vec![name.to_string()];
        all.extend(alias.iter().map(|a| a.to_string()));
        Command {
            name: name.into(),
            alias: all,
            ..Default::default()
        }
    }

    #[test]
    fn wildcard_alias_matches_by_prefix() {
        let cmd = command("full", &["f*"]);
        assert!(cmd.matches("full"));
        assert!(cmd.matches("foo"));
        assert!(cmd.matches("f"));
        assert!(!cmd.matches("bar"));
    }

    #[test]
    fn plain_alias_matches_exactly() {
        let cmd = command("download", &["d", "get"]);
        assert!(cmd.matches("d"));
        assert!(cmd.matches("get"));
        assert!(!cmd.matches("dl"));
        assert_eq!(cmd.secondary_aliases(), ["d".to_string(), "get".to_string()]);
    }

    #[test]
    fn deep_commands_is_preorder() {
        let mut root = command("root", &[]);
        let mut a = command("a", &[]);
        a.commands.push(command("a1", &[]));
        root.commands.push(a);
        root.commands.push(command("b", &[]));

        let names: Vec<_> = root.deep_commands(true).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["root", "a", "a1", "b"]);

        let names: Vec<_> = root.deep_commands(false).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "a1", "b"]);
    }

    #[test]
    fn pruned_drops_private_items() {
        let mut root = command("root", &[]);
        root.flags.push(Flag {
            long: Some("--debug".into()),
            private: true,
            ..Default::default()
        });
        root.flags.push(Flag {
            long: Some("--verbose".into()),
            ..Default::default()
        });
        let mut secret = command("secret", &[]);
        secret.private = true;
        root.commands.push(secret);
        root.commands.push(command("public", &[]));

        let pruned = root.pruned(false);
        assert_eq!(pruned.flags.len(), 1);
        assert_eq!(pruned.commands.len(), 1);
        assert_eq!(pruned.commands[0].name, "public");

        assert_eq!(root.pruned(true), root);
    }

    #[test]
    fn flag_display_name_prefers_long() {
        let both = Flag {
            long: Some("--out".into()),
            short: Some("-o".into()),
            ..Default::default()
        };
        let short_only = Flag {
            short: Some("-o".into()),
            ..Default::default()
        };
        assert_eq!(both.display_name(), "--out");
        assert_eq!(short_only.display_name(), "-o");
    }
}
