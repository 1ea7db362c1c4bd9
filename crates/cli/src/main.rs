use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use command::{CommandHandler, CommandRequest, CommandResponse, ResponseMeta};
use config::EngineConfig;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

mod command;
mod config;

#[derive(Parser)]
#[command(name = "edit-context")]
#[command(about = "Edit targeting and context assembly for AI code edits", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (TOML); defaults to ./.edit-context.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a JSON Command API request
    Command(CommandArgs),

    /// Print the effective engine configuration as TOML
    #[command(name = "show-config")]
    ShowConfig,
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON request (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing the JSON request
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    if matches!(cli.command, Commands::Command(_)) {
        // stdout carries the JSON response only
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();

    let workdir = std::env::current_dir().context("Failed to resolve working directory")?;
    let loaded = EngineConfig::load(cli.config.as_deref(), &workdir);

    match cli.command {
        Commands::Command(args) => run_command(args, loaded),
        Commands::ShowConfig => {
            let (config, _) = loaded?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn run_command(args: CommandArgs, loaded: Result<(EngineConfig, Option<PathBuf>)>) -> Result<()> {
    let response = match loaded.and_then(|loaded| Ok((loaded, read_request(&args)?))) {
        Ok(((config, config_path), request)) => {
            CommandHandler::new(config, config_path).execute(request)
        }
        Err(err) => {
            log::error!("{err:#}");
            CommandResponse::error(&err, ResponseMeta::default())
        }
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn read_request(args: &CommandArgs) -> Result<CommandRequest> {
    let raw = read_payload(args)?;
    serde_json::from_str(&raw).context("Invalid JSON passed to --json/--file")
}

fn read_payload(args: &CommandArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Command request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}
