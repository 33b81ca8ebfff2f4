//! # mfst CLI entry point
//!
//! Parses command-line arguments, builds the document catalog once, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mfst_cli::config::CliConfig;
use mfst_cli::render::{run_render, RenderArgs};
use mfst_cli::schemas::{run_schemas, SchemasArgs};
use mfst_cli::validate::{run_validate, ValidateArgs};
use mfst_schema::Catalog;

/// Schema-driven manifest validator and renderer.
///
/// Checks YAML or JSON input against a built-in document type and emits
/// canonical manifests with computed identity fields.
#[derive(Parser, Debug)]
#[command(name = "mfst", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an input file and report every problem found.
    Validate(ValidateArgs),

    /// Validate an input file and emit the canonical manifest.
    Render(RenderArgs),

    /// List or describe the built-in document types.
    Schemas(SchemasArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("mfst CLI v{} starting", env!("CARGO_PKG_VERSION"));

    // Built-in schema errors are fatal.
    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("invalid built-in schema: {e}");
            return ExitCode::from(2);
        }
    };

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Validate(args) => run_validate(args, &catalog),
        Commands::Render(args) => run_render(args, &catalog, &config),
        Commands::Schemas(args) => run_schemas(args, &catalog),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
