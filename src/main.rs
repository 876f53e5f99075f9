//! Binary entry point for promptweave.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Args, Parser, Subcommand};
use promptweave::cli::{self, OutputFormat, PromptSource, VariableOverride};
use promptweave::config::PromptweaveConfig;
use promptweave::observability::{self, InitOptions};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Promptweave - compose prompts from fragments with `{name}` placeholders.
#[derive(Parser)]
#[command(name = "promptweave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "PROMPTWEAVE_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Render fragments into a single prompt.
    Render {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List each fragment's id and rendered content.
    Introspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

/// Fragment sources shared by all commands.
#[derive(Args)]
struct SourceArgs {
    /// Prompt definition file (.toml, .json, .yaml).
    file: Option<PathBuf>,

    /// Inline fragment text, appended after the file's fragments.
    #[arg(short = 'f', long = "fragment")]
    fragments: Vec<String>,

    /// Variable override as [INDEX:]KEY=VALUE (index defaults to 0).
    #[arg(short = 's', long = "set")]
    overrides: Vec<String>,
}

impl SourceArgs {
    fn into_source(self) -> Result<PromptSource, Box<dyn std::error::Error>> {
        let overrides = self
            .overrides
            .iter()
            .map(|s| s.parse::<VariableOverride>())
            .collect::<promptweave::Result<Vec<_>>>()?;

        Ok(PromptSource {
            file: self.file,
            fragments: self.fragments,
            overrides,
        })
    }
}

/// Main entry point.
fn main() -> ExitCode {
    // Loaded before parsing so .env can supply PROMPTWEAVE_CONFIG_PATH; a missing file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match PromptweaveConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Render { source } => cli::cmd_render(&source.into_source()?, &mut out)?,
        Commands::Introspect { source, format } => cli::cmd_introspect(
            &source.into_source()?,
            OutputFormat::parse(&format),
            &mut out,
        )?,
    }

    out.flush()?;
    Ok(())
}
