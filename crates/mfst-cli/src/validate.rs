//! # Validate Subcommand
//!
//! `mfst validate <PATH> [--kind KIND] [--json]`
//!
//! Exit code 0 when the input is valid, 1 when diagnostics were reported.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use mfst_core::Diagnostics;
use mfst_schema::Catalog;
use serde_json::{json, Value};

use crate::{load_input, resolve_schema};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Input manifest (YAML or JSON).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Document type. Defaults to the input's `kind` key.
    #[arg(long)]
    pub kind: Option<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, catalog: &Catalog) -> Result<u8> {
    let input = load_input(&args.path)?;
    let schema = resolve_schema(catalog, args.kind.as_deref(), &input)?;
    let diagnostics = mfst_schema::validate(&input, schema);
    let source = args.path.display().to_string();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json_report(&source, schema.kind(), &diagnostics))?
        );
    } else {
        print!("{}", text_report(&source, schema.kind(), &diagnostics));
    }
    Ok(if diagnostics.is_empty() { 0 } else { 1 })
}

/// One `OK:` line, or one `FAIL:` line per diagnostic.
pub fn text_report(source: &str, kind: &str, diagnostics: &Diagnostics) -> String {
    if diagnostics.is_empty() {
        return format!("OK: {source} ({kind})\n");
    }
    let mut out = String::new();
    for d in diagnostics.iter() {
        out.push_str(&format!("FAIL: {source}: {}: {}\n", d.path, d.message));
    }
    out.push_str(&format!("{} problem(s) in {source}\n", diagnostics.len()));
    out
}

/// Machine-readable report. Paths are rendered in dotted form.
pub fn json_report(source: &str, kind: &str, diagnostics: &Diagnostics) -> Value {
    let items: Vec<Value> = diagnostics
        .iter()
        .map(|d| {
            json!({
                "path": d.path.to_string(),
                "category": d.category(),
                "kind": d.kind,
                "message": d.message,
            })
        })
        .collect();
    json!({
        "source": source,
        "kind": kind,
        "valid": diagnostics.is_empty(),
        "diagnostics": items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfst_core::{Diagnostic, FieldPath};

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn valid_file_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "secret.yaml", "kind: Secret\nmetadata:\n  name: creds\n");
        let args = ValidateArgs {
            path,
            kind: None,
            json: false,
        };
        assert_eq!(run_validate(&args, &catalog()).unwrap(), 0);
    }

    #[test]
    fn invalid_file_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "secret.json", r#"{"metadata": {"name": "Bad_Name"}}"#);
        let args = ValidateArgs {
            path,
            kind: Some("Secret".into()),
            json: true,
        };
        assert_eq!(run_validate(&args, &catalog()).unwrap(), 1);
    }

    #[test]
    fn missing_kind_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "x.yaml", "metadata:\n  name: a\n");
        let args = ValidateArgs {
            path,
            kind: None,
            json: false,
        };
        assert!(run_validate(&args, &catalog()).is_err());
    }

    #[test]
    fn text_report_lines() {
        assert_eq!(text_report("a.yaml", "Secret", &Diagnostics::new()), "OK: a.yaml (Secret)\n");

        let mut d = Diagnostics::new();
        d.push(Diagnostic::missing_required(FieldPath::parse("metadata.name")));
        let text = text_report("a.yaml", "Secret", &d);
        assert!(text.starts_with("FAIL: a.yaml: metadata.name"));
        assert!(text.ends_with("1 problem(s) in a.yaml\n"));
    }

    #[test]
    fn json_report_shape() {
        let mut d = Diagnostics::new();
        d.push(Diagnostic::missing_required(FieldPath::parse("spec.provider")));
        let report = json_report("a.yaml", "SecretStore", &d);
        assert_eq!(report["valid"], false);
        assert_eq!(report["diagnostics"][0]["path"], "spec.provider");
        assert_eq!(report["diagnostics"][0]["category"], "constraint");
        assert_eq!(report["diagnostics"][0]["kind"]["type"], "missing_required");
    }
}
