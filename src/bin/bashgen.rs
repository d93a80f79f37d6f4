// src/bin/bashgen.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bashgen::cli::{Action, Cli, InspectFormat, ProjectArgs};
use bashgen::constants::IMPORT_KEYWORD;
use bashgen::core::graph_display::{self, TreeOptions};
use bashgen::core::{builder, config_loader, resolver, usage, validator};
use bashgen::models::Command;
use bashgen::settings::Settings;
use bashgen::system::partials::{self, GenerateOptions};

/// Entry point. Run with `RUST_LOG=debug bashgen ...` to see the logs.
fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run_cli(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> Result<ExitCode> {
    log::debug!("CLI args parsed: {:?}", cli);

    match cli.command {
        Action::Version => {
            println!("{} version {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            println!("{}", env!("CARGO_PKG_DESCRIPTION"));
            Ok(ExitCode::SUCCESS)
        }
        Action::Inspect { project, format } => handle_inspect(&project, format),
        Action::Generate {
            project,
            force,
            dry_run,
        } => handle_generate(&project, force, dry_run),
        Action::Usage { project, path } => handle_usage(&project, &path),
        Action::Parse { project, argv } => handle_parse(&project, &argv),
    }
}

/// A loaded project: its settings, working directory and command tree.
struct Project {
    workdir: PathBuf,
    settings: Settings,
    root: Command,
}

fn load_project(args: &ProjectArgs) -> Result<Project> {
    // 1. Working directory and settings.
    let workdir = match &args.workdir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("Could not determine the current directory.")?,
    };
    let settings = Settings::load(&workdir).context("Could not load settings.")?;

    // 2. Configuration with imports expanded.
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.config_path));
    let config = config_loader::load_composed_config(&config_path, IMPORT_KEYWORD, &workdir)
        .with_context(|| format!("Could not load configuration '{}'.", config_path.display()))?;

    // 3. Command tree.
    let root = builder::build(&config, &settings).context("Invalid command configuration.")?;
    log::info!("Loaded '{}' from {}", root.name, workdir.display());

    Ok(Project {
        workdir,
        settings,
        root,
    })
}

fn handle_inspect(args: &ProjectArgs, format: InspectFormat) -> Result<ExitCode> {
    let project = load_project(args)?;
    let reveal = project.settings.reveal_private();

    match format {
        InspectFormat::Tree => {
            let opts = TreeOptions {
                show_details: true,
                reveal_private: reveal,
            };
            print!("{}", graph_display::render_tree(&project.root, &opts));
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&project.root.pruned(reveal))
                .context("Could not serialize the command tree to JSON.")?;
            println!("{}", json);
        }
        InspectFormat::Toml => {
            let toml = toml::to_string_pretty(&project.root.pruned(reveal))
                .context("Could not serialize the command tree to TOML.")?;
            print!("{}", toml);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_generate(args: &ProjectArgs, force: bool, dry_run: bool) -> Result<ExitCode> {
    let project = load_project(args)?;
    let opts = GenerateOptions {
        workdir: project.workdir.clone(),
        force,
        dry_run,
    };
    let report = partials::ensure_command_partials(&project.root, &project.settings, &opts)
        .context("Could not generate command partials.")?;

    for path in &report.created {
        let shown = display_relative(path, &project.workdir);
        if dry_run {
            println!("{}", shown);
        } else {
            println!("created: {}", shown);
        }
    }
    for path in &report.skipped {
        log::info!("skipped: {}", display_relative(path, &project.workdir));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_usage(args: &ProjectArgs, path: &[String]) -> Result<ExitCode> {
    let project = load_project(args)?;
    let root = project.root.pruned(project.settings.reveal_private());

    let (command, consumed) = resolver::resolve_command_path(path, &root);
    if consumed < path.len() {
        anyhow::bail!("Unknown command '{}' under '{}'.", path[consumed], command.full_name);
    }
    print!("{}", render_help(command));
    Ok(ExitCode::SUCCESS)
}

fn handle_parse(args: &ProjectArgs, argv: &[String]) -> Result<ExitCode> {
    let project = load_project(args)?;
    let parsed = resolver::resolve(argv, &project.root)?;

    if parsed.help_asked {
        let visible = project.root.pruned(project.settings.reveal_private());
        print!("{}", render_help(&visible));
        return Ok(ExitCode::SUCCESS);
    }

    if let Err(e) = validator::check(parsed.command, &parsed) {
        eprintln!("{}", e);
        return Ok(exit_code(e.exit_code()));
    }

    println!("command: {}", parsed.command.action_name);
    for (name, value) in &parsed.flags {
        println!("flag: {}={}", name, value);
    }
    for value in &parsed.positional {
        println!("arg: {}", value);
    }
    Ok(ExitCode::SUCCESS)
}

fn render_help(command: &Command) -> String {
    if command.is_root() {
        usage::render_global_usage(command)
    } else {
        usage::render_usage(command)
    }
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}
