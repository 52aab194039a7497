//! CLI error types.

use optim_models::ModelError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `optim` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file named on the command line does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A command-line argument has an unsupported value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The scenario file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A model rejected the scenario or failed to solve.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
