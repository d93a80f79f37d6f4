// src/core/validator.rs

use thiserror::Error;

use crate::constants::VALIDATION_EXIT_CODE;
use crate::models::{Command, Flag, ParsedArgs, ValidationResult};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required argument: {0}")]
    MissingArgument(String),
    #[error("missing required flag: {0}")]
    MissingFlag(String),
    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },
}

impl ValidationError {
    /// Process exit code a CLI should use for this failure.
    pub fn exit_code(&self) -> i32 {
        VALIDATION_EXIT_CODE
    }
}

/// Runs the three checks in order and stops at the first failure.
pub fn check(command: &Command, parsed: &ParsedArgs<'_>) -> Result<(), ValidationError> {
    // 1. Required arguments: the slot at the argument's position is filled,
    //    or its name was passed literally.
    for (index, arg) in command.args.iter().enumerate().filter(|(_, a)| a.required) {
        let filled = parsed.positional.get(index).is_some_and(|p| !p.is_empty());
        if !filled && !parsed.positional.iter().any(|p| p == &arg.name) {
            return Err(ValidationError::MissingArgument(arg.name.clone()));
        }
    }

    // 2. Required flags, long form first.
    for flag in command.flags.iter().filter(|f| f.required) {
        if flag_value(flag, parsed).is_none() {
            return Err(ValidationError::MissingFlag(flag.display_name().to_string()));
        }
    }

    // 3. Allowed values.
    for flag in command.flags.iter().filter(|f| !f.allowed.is_empty()) {
        if let Some(value) = flag_value(flag, parsed)
            && !flag.allowed.iter().any(|a| a == value)
        {
            return Err(ValidationError::InvalidValue {
                flag: flag.display_name().to_string(),
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

/// Same checks as [`check`], folded into a [`ValidationResult`].
pub fn validate(command: &Command, parsed: &ParsedArgs<'_>) -> ValidationResult {
    match check(command, parsed) {
        Ok(()) => ValidationResult::ok(),
        Err(e) => {
            log::debug!("Validation failed for '{}': {}", command.full_name, e);
            ValidationResult::failed(e.to_string())
        }
    }
}

fn flag_value<'p>(flag: &Flag, parsed: &'p ParsedArgs<'_>) -> Option<&'p str> {
    flag.long
        .as_deref()
        .and_then(|long| parsed.flag_value(long))
        .or_else(|| flag.short.as_deref().and_then(|short| parsed.flag_value(short)))
}
