// src/core/graph_display.rs

use crate::models::Command;

/// What `render_tree` shows on each line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeOptions {
    pub show_details: bool,
    pub reveal_private: bool,
}

/// Renders the command tree with box-drawing connectors, one command per line.
pub fn render_tree(root: &Command, opts: &TreeOptions) -> String {
    let mut out = String::new();
    if root.private && !opts.reveal_private {
        return out;
    }

    // 1. The root line carries the full name and no connector.
    let label = if opts.show_details {
        format_details(root, opts)
    } else {
        root.full_name.clone()
    };
    out.push_str(&label);
    out.push('\n');

    // 2. Children hang off a two-space prefix.
    render_children(root, opts, "  ", &mut out);
    out
}

/// Recursive helper that prints the visible children of `parent` and their subtrees.
fn render_children(parent: &Command, opts: &TreeOptions, prefix: &str, out: &mut String) {
    let visible: Vec<&Command> = parent
        .commands
        .iter()
        .filter(|c| opts.reveal_private || !c.private)
        .collect();

    for (i, child) in visible.iter().enumerate() {
        let is_last = i == visible.len() - 1;
        let connector = if is_last { "└─" } else { "├─" };
        let label = if opts.show_details {
            format_details(child, opts)
        } else {
            child.name.clone()
        };
        out.push_str(&format!("{}{} {}\n", prefix, connector, label));

        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        render_children(child, opts, &child_prefix, out);
    }
}

fn format_details(cmd: &Command, opts: &TreeOptions) -> String {
    let mut parts = vec![cmd.name.clone()];
    if !cmd.filename.is_empty() {
        parts.push(format!("[{}]", cmd.filename));
    }
    if cmd.private {
        parts.push("(private)".to_string());
    }
    if !cmd.secondary_aliases().is_empty() {
        parts.push(format!("alias={}", cmd.secondary_aliases().join(",")));
    }

    let flags = cmd.visible_flags(opts.reveal_private).len();
    if flags > 0 {
        parts.push(format!("flags={}", flags));
    }
    let env = cmd.visible_env_vars(opts.reveal_private).len();
    if env > 0 {
        parts.push(format!("env={}", env));
    }
    parts.join(" ")
}
