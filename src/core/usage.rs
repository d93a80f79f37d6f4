// src/core/usage.rs

//! Plain-text help screens.
//!
//! Both renderers list whatever the command carries. Pass a
//! [`Command::pruned`] copy to keep private items out of the output.

use crate::models::{Command, Flag};

/// Help for a single command: header, usage line, arguments, flags and
/// immediate subcommands.
pub fn render_usage(cmd: &Command) -> String {
    let mut sections = vec![header(cmd)];

    let mut usage = format!("Usage: {}", cmd.full_name);
    for arg in &cmd.args {
        usage.push(' ');
        usage.push_str(&arg.name);
    }
    sections.push(usage);

    if !cmd.args.is_empty() {
        let lines: Vec<String> = cmd
            .args
            .iter()
            .map(|arg| {
                if arg.required {
                    format!("{} (required)", arg.name)
                } else {
                    arg.name.clone()
                }
            })
            .collect();
        sections.push(section("Arguments:", &lines));
    }
    if !cmd.flags.is_empty() {
        sections.push(flags_section("Flags:", &cmd.flags));
    }
    if !cmd.commands.is_empty() {
        sections.push(commands_section(cmd));
    }

    finish(sections)
}

/// Top-level help for the root: header, generic usage line, commands and
/// global flags.
pub fn render_global_usage(root: &Command) -> String {
    let mut sections = vec![
        header(root),
        format!("Usage: {} <command> [options]", root.name),
    ];
    if !root.commands.is_empty() {
        sections.push(commands_section(root));
    }
    if !root.flags.is_empty() {
        sections.push(flags_section("Global Flags:", &root.flags));
    }
    finish(sections)
}

fn header(cmd: &Command) -> String {
    format!("{} - {}", cmd.name, cmd.description)
}

fn flags_section(title: &str, flags: &[Flag]) -> String {
    let lines: Vec<String> = flags.iter().map(flag_line).collect();
    section(title, &lines)
}

fn flag_line(flag: &Flag) -> String {
    let mut line = [flag.long.as_deref(), flag.short.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    if flag.required {
        line.push_str(" (required)");
    }
    if !flag.allowed.is_empty() {
        line.push_str(&format!(" (allowed: {})", flag.allowed.join(", ")));
    }
    line
}

fn commands_section(cmd: &Command) -> String {
    let lines: Vec<String> = cmd
        .commands
        .iter()
        .map(|sub| match sub.secondary_aliases() {
            [] => sub.name.clone(),
            aliases => format!("{} ({})", sub.name, aliases.join(", ")),
        })
        .collect();
    section("Commands:", &lines)
}

fn section(title: &str, lines: &[String]) -> String {
    let mut out = title.to_string();
    for line in lines {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

fn finish(sections: Vec<String>) -> String {
    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}
