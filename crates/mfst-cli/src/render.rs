//! # Render Subcommand
//!
//! `mfst render <PATH> [--kind KIND] [--format yaml|json] [--out FILE] [--state-out FILE]`
//!
//! Writes the canonical manifest to `--out` (or stdout) and, with
//! `--state-out`, the [`DocumentState`](mfst_schema::DocumentState) record to
//! persist for the next update. Invalid input prints the same report as
//! `validate` and exits 1; nothing is written.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use mfst_core::IdSource;
use mfst_schema::{Catalog, OutputFormat, RenderFailure, RenderedDocument, Renderer};

use crate::config::CliConfig;
use crate::validate::text_report;
use crate::{load_input, resolve_schema};

/// Arguments for the render subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input manifest (YAML or JSON).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Document type. Defaults to the input's `kind` key.
    #[arg(long)]
    pub kind: Option<String>,

    /// Output encoding. Overrides the config file.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the manifest here instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Write the state record (id, discriminators, digest) here.
    #[arg(long, value_name = "FILE")]
    pub state_out: Option<PathBuf>,
}

/// Execute the render subcommand.
pub fn run_render(args: &RenderArgs, catalog: &Catalog, config: &CliConfig) -> Result<u8> {
    let format = args.format.unwrap_or(config.output_format);
    run_render_with(args, catalog, &Renderer::default().with_format(format))
}

/// Execute the render subcommand with a caller-supplied renderer.
pub fn run_render_with<S: IdSource>(
    args: &RenderArgs,
    catalog: &Catalog,
    renderer: &Renderer<S>,
) -> Result<u8> {
    let input = load_input(&args.path)?;
    let schema = resolve_schema(catalog, args.kind.as_deref(), &input)?;
    let source = args.path.display().to_string();

    let rendered = match mfst_schema::render(&input, schema, renderer) {
        Ok(rendered) => rendered,
        Err(RenderFailure::Invalid(diagnostics)) => {
            print!("{}", text_report(&source, schema.kind(), &diagnostics));
            return Ok(1);
        }
        Err(e @ RenderFailure::Internal(_)) => {
            return Err(e).with_context(|| format!("cannot render {source}"));
        }
    };
    log_drift(&source, &rendered);

    match &args.out {
        Some(out) => write_file(out, rendered.text())?,
        None => print!("{}", rendered.text()),
    }
    if let Some(state_out) = &args.state_out {
        let mut state = serde_json::to_string_pretty(&rendered.state())?;
        state.push('\n');
        write_file(state_out, &state)?;
    }
    Ok(0)
}

fn log_drift(source: &str, rendered: &RenderedDocument) {
    match rendered.changed() {
        Some(true) => tracing::info!(
            source,
            previous = ?rendered.previous_id(),
            "document shape changed since previous render"
        ),
        Some(false) => tracing::info!(source, "document shape unchanged"),
        None => {}
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}
