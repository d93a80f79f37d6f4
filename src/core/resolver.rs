// src/core/resolver.rs

use thiserror::Error;

use crate::constants::FLAG_PRESENT;
use crate::models::{Command, ParsedArgs};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The walk ended on a command with an empty name. `builder::build` never
    /// produces one, so this only fires for hand-built trees.
    #[error("unknown command")]
    UnknownCommand,
}

/// Matches `argv` against the tree under `root` and splits what is left into
/// flags and positionals.
pub fn resolve<'a>(argv: &[String], root: &'a Command) -> Result<ParsedArgs<'a>, ResolveError> {
    // 1. Help anywhere short-circuits everything else.
    if argv.iter().any(|t| t == "--help" || t == "-h") {
        log::debug!("Help requested, resolving to '{}'", root.full_name);
        let mut parsed = ParsedArgs::new(root);
        parsed.help_asked = true;
        return Ok(parsed);
    }

    // 2. Walk the command path. A nameless node stands in for "no command".
    let (command, consumed) = resolve_command_path(argv, root);
    if command.name.is_empty() {
        return Err(ResolveError::UnknownCommand);
    }
    log::debug!(
        "Resolved '{}' after {} token(s)",
        command.full_name,
        consumed
    );

    // 3. Tokenize the rest.
    let mut parsed = ParsedArgs::new(command);
    let remaining = argv[consumed..].to_vec();
    tokenize(&remaining, &mut parsed);
    parsed.remaining = remaining;
    Ok(parsed)
}

/// Descends from `root` while the next token names a child. Returns the
/// deepest command reached and how many tokens the path used.
pub fn resolve_command_path<'a, S: AsRef<str>>(tokens: &[S], root: &'a Command) -> (&'a Command, usize) {
    let mut current = root;
    let mut consumed = 0;
    for token in tokens {
        match current.find_child(token.as_ref()) {
            Some(child) => {
                current = child;
                consumed += 1;
            }
            None => break,
        }
    }
    (current, consumed)
}

fn tokenize(tokens: &[String], parsed: &mut ParsedArgs<'_>) {
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];

        if token.starts_with("--") {
            if let Some((name, value)) = token.split_once('=') {
                parsed.flags.insert(name.to_string(), value.to_string());
            } else {
                let value = take_value(tokens, &mut i);
                parsed.flags.insert(token.clone(), value);
            }
        } else if token.starts_with('-') && token.chars().count() == 2 {
            let value = take_value(tokens, &mut i);
            parsed.flags.insert(token.clone(), value);
        } else if token.starts_with('-') && token.chars().count() > 2 {
            // Compact cluster: every letter is a presence flag.
            for c in token.chars().skip(1) {
                parsed.flags.insert(format!("-{}", c), FLAG_PRESENT.to_string());
            }
        } else {
            parsed.positional.push(token.clone());
        }
        i += 1;
    }
}

/// Consumes the token after `*i` as a value when it does not look like a flag.
fn take_value(tokens: &[String], i: &mut usize) -> String {
    match tokens.get(*i + 1) {
        Some(next) if !next.starts_with('-') => {
            *i += 1;
            next.clone()
        }
        _ => FLAG_PRESENT.to_string(),
    }
}
