//! Utility functions for CLI operations.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::config::Config;
use crate::source::SourceSpec;

/// Get the record source, with a helpful error message.
pub fn require_source(source: Option<SourceSpec>) -> Result<SourceSpec> {
    source.ok_or_else(|| {
        anyhow!(
            "No record source specified. Pass a .json or .csv file (or '-' for stdin),\n\
             or set a default with 'battview config set source <FILE>'."
        )
    })
}

/// Resolve and require a source from arguments and config.
#[cfg(feature = "cli")]
pub fn source_from(args: &crate::cli::SourceArgs, config: &Config) -> Result<SourceSpec> {
    require_source(args.resolve(config.source.as_deref()))
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_source_with_some() {
        let spec = SourceSpec::new("pack.json", None);
        assert_eq!(require_source(Some(spec.clone())).unwrap(), spec);
    }

    #[test]
    fn test_require_source_with_none() {
        let err = require_source(None).unwrap_err();
        assert!(err.to_string().contains("No record source specified"));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
