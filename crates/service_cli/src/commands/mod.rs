//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub mod check;
pub mod frontier;
pub mod transport;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
    Csv,
}

impl Format {
    /// Parse `name`, accepting only the formats in `supported`.
    pub fn parse(name: &str, supported: &[Format]) -> crate::Result<Self> {
        let format = match name.to_lowercase().as_str() {
            "table" => Some(Format::Table),
            "json" => Some(Format::Json),
            "csv" => Some(Format::Csv),
            _ => None,
        };
        match format {
            Some(f) if supported.contains(&f) => Ok(f),
            _ => Err(crate::CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: {}",
                name,
                supported
                    .iter()
                    .map(Format::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Table => "table",
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }
}

/// Report timestamp (RFC 3339, UTC).
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Buffered writer to `path`, or to stdout when `None`.
pub fn open_output(path: Option<&Path>) -> crate::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}
