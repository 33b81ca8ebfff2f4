//! # mfst-cli: Command-Line Host for the mfst Engine
//!
//! Loads manifest input from disk, hands it to `mfst-schema`, and prints
//! diagnostics or rendered documents.
//!
//! ## Subcommands
//!
//! - `mfst validate`: Check an input file against its document type.
//! - `mfst render`: Validate, then emit the canonical manifest.
//! - `mfst schemas`: List or describe the built-in document types.
//!
//! ```bash
//! mfst validate store.yaml
//! mfst render store.yaml --format json --out store.json --state-out store.state.json
//! mfst schemas describe SecretStore
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers live in one module per
//!   subcommand and return an exit code.
//! - No validation or rendering logic here. Handlers delegate to
//!   `mfst_schema::{validate, render}`.

pub mod config;
pub mod render;
pub mod schemas;
pub mod validate;

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use mfst_schema::{Catalog, DocumentSchema};
use serde_json::Value;

/// Read an input file as a JSON value tree.
///
/// `.yaml` and `.yml` files are parsed as YAML and converted; anything
/// else is parsed as JSON.
pub fn load_input(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML in {}", path.display()))?;
            yaml_to_json_value(&yaml)
                .map_err(|e| anyhow!("cannot convert {} to JSON: {e}", path.display()))
        }
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display())),
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Tags are dropped. Mapping keys must be strings, numbers or booleans.
/// Non-finite floats (`.nan`, `.inf`) have no JSON form and are errors.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => Value::Number(yaml_number(n)?),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Array(
            items
                .iter()
                .map(yaml_to_json_value)
                .collect::<Result<_, String>>()?,
        ),
        Yaml::Mapping(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| -> Result<(String, Value), String> {
                    Ok((yaml_key(k)?, yaml_to_json_value(v)?))
                })
                .collect::<Result<_, String>>()?,
        ),
        Yaml::Tagged(tagged) => return yaml_to_json_value(&tagged.value),
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Result<serde_json::Number, String> {
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .ok_or_else(|| format!("cannot represent number {n} in JSON"))
}

fn yaml_key(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("unsupported mapping key: {other:?}")),
    }
}

/// Pick the schema for an input.
///
/// An explicit `--kind` wins; otherwise the input's own root `kind` key is
/// used as a hint. The hint never reaches the output, since the renderer
/// always writes the schema's discriminators.
pub fn resolve_schema<'a>(
    catalog: &'a Catalog,
    kind: Option<&str>,
    input: &Value,
) -> Result<&'a DocumentSchema> {
    let kind = match kind {
        Some(kind) => kind,
        None => match input.get("kind") {
            Some(Value::String(kind)) => kind.as_str(),
            _ => bail!("input has no `kind`; pass --kind"),
        },
    };
    catalog.get(kind).ok_or_else(|| {
        let known = catalog.kinds().collect::<Vec<_>>().join(", ");
        anyhow!("unknown document type `{kind}` (known: {known})")
    })
}
