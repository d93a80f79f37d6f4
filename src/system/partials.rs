// src/system/partials.rs

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Command;
use crate::settings::Settings;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("cannot write partial '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where and how `ensure_command_partials` writes.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub workdir: PathBuf,
    /// Overwrite partials that already exist.
    pub force: bool,
    /// Report what would be created without touching the disk.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Makes sure every command of the tree has an implementation partial under
/// `<workdir>/<source_dir>`.
pub fn ensure_command_partials(
    root: &Command,
    settings: &Settings,
    opts: &GenerateOptions,
) -> Result<GenerateReport, GenerateError> {
    let source_root = opts.workdir.join(&settings.source_dir);
    let mut report = GenerateReport::default();

    for command in root.deep_commands(true) {
        if command.filename.is_empty() {
            continue;
        }
        let path = source_root.join(&command.filename);

        if path.exists() && !opts.force {
            log::debug!("Keeping existing partial {}", path.display());
            report.skipped.push(path);
            continue;
        }

        if opts.dry_run {
            report.created.push(path);
            continue;
        }

        write_partial(&path, &stub(command, settings))?;
        log::info!("Created partial {}", path.display());
        report.created.push(path);
    }

    Ok(report)
}

/// Placeholder body for a command partial.
pub fn stub(command: &Command, settings: &Settings) -> String {
    let location = Path::new(&settings.source_dir).join(&command.filename);
    format!(
        "echo \"# This file is located at '{}'.\"\n\
         echo \"# It contains the implementation for the '{}' command.\"\n\
         inspect_args\n",
        location.display(),
        command.full_name
    )
}

fn write_partial(path: &Path, content: &str) -> Result<(), GenerateError> {
    let io_err = |source| GenerateError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}
