//! # Schemas Subcommand
//!
//! ```bash
//! mfst schemas list
//! mfst schemas describe SecretStore
//! ```

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use mfst_schema::Catalog;

/// Schemas subcommand arguments.
#[derive(Args, Debug)]
pub struct SchemasArgs {
    #[command(subcommand)]
    pub command: SchemasCommand,
}

/// Available schemas subcommands.
#[derive(Subcommand, Debug)]
pub enum SchemasCommand {
    /// List the built-in document types.
    List,

    /// Print the field tree of one document type.
    Describe {
        /// Type-name, e.g. `SecretStore`.
        #[arg(value_name = "KIND")]
        kind: String,
    },
}

/// Execute the schemas subcommand.
pub fn run_schemas(args: &SchemasArgs, catalog: &Catalog) -> Result<u8> {
    let text = match &args.command {
        SchemasCommand::List => list(catalog),
        SchemasCommand::Describe { kind } => describe(catalog, kind)?,
    };
    print!("{text}");
    Ok(0)
}

fn list(catalog: &Catalog) -> String {
    let mut out = String::from("Document types:\n\n");
    for schema in catalog.iter() {
        out.push_str(&format!(
            "  {:<20} {}\n",
            schema.kind(),
            schema.type_meta().api_version
        ));
    }
    out.push_str(&format!("\nTotal: {} types\n", catalog.len()));
    out
}

fn describe(catalog: &Catalog, kind: &str) -> Result<String> {
    catalog.get(kind).map(|schema| schema.describe()).ok_or_else(|| {
        let known = catalog.kinds().collect::<Vec<_>>().join(", ");
        anyhow!("unknown document type `{kind}` (known: {known})")
    })
}
