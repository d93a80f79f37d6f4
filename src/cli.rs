// src/cli.rs

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "bashgen: builds, inspects and exercises bash CLI definitions.", long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Action,
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Prints the program name, version and description.
    Version,

    /// Shows the command tree built from the configuration.
    Inspect {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = InspectFormat::Tree)]
        format: InspectFormat,
    },

    /// Creates a placeholder partial for every command that lacks one.
    Generate {
        #[command(flatten)]
        project: ProjectArgs,

        /// Overwrite existing partials.
        #[arg(long)]
        force: bool,

        /// Show what would be written without touching the disk.
        #[arg(long)]
        dry_run: bool,
    },

    /// Prints the help screen of a command (the root when no path is given).
    Usage {
        #[command(flatten)]
        project: ProjectArgs,

        /// Command path, e.g. `download file`.
        path: Vec<String>,
    },

    /// Resolves and validates an invocation of the configured CLI.
    Parse {
        #[command(flatten)]
        project: ProjectArgs,

        /// Arguments as the end user would type them, after `--`.
        #[arg(last = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },
}

/// Where to find the configuration.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Path to the configuration file (defaults to the `config_path` setting).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Working directory holding settings and sources (defaults to the current directory).
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectFormat {
    Tree,
    Json,
    Toml,
}
