//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Command-line flags override
//! anything set here.
//!
//! ```yaml
//! output_format: json
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use mfst_schema::OutputFormat;
use serde::Deserialize;

/// Settings read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Format used by `render` when `--format` is not given.
    pub output_format: OutputFormat,
}

impl CliConfig {
    /// Load the config file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        // An empty file parses as null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), format = %config.output_format, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_gives_defaults() {
        assert_eq!(CliConfig::load(None).unwrap().output_format, OutputFormat::Yaml);
    }

    #[test]
    fn reads_output_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mfst.yaml");
        std::fs::write(&path, "output_format: json\n").unwrap();
        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mfst.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(CliConfig::load(Some(&path)).unwrap(), CliConfig::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mfst.yaml");
        std::fs::write(&path, "outputFormat: json\n").unwrap();
        assert!(CliConfig::load(Some(&path)).is_err());
    }
}
