//! Optim CLI - Transport and Efficient-Frontier Reports
//!
//! Operational entry point for the optimisation models.
//!
//! # Commands
//!
//! - `optim transport [--mode direct|transshipment|both]` - Solve the waste-disposal network
//! - `optim frontier [--low X --high Y --points N]` - Sweep the efficient frontier
//! - `optim check` - Validate the scenario file
//!
//! # Architecture
//!
//! As the service layer over `optim_models`, this crate loads a scenario,
//! hands it to the models and formats what comes back.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::frontier::SweepArgs;
use config::LogLevel;

/// Transportation and portfolio optimisation CLI
#[derive(Parser)]
#[command(name = "optim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Scenario file path (default: ./optim.toml, else the built-in scenario)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the transport network
    Transport {
        /// Models to solve (direct, transshipment, both)
        #[arg(short, long, default_value = "both")]
        mode: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Trace the efficient frontier
    Frontier {
        /// Lowest return target
        #[arg(long)]
        low: Option<f64>,

        /// Highest return target
        #[arg(long)]
        high: Option<f64>,

        /// Number of targets
        #[arg(short, long)]
        points: Option<usize>,

        /// Output format (table, json, csv)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the scenario without solving
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let scenario = config::load_scenario(cli.config.as_deref())?;

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        scenario.log_level
    };
    // RUST_LOG wins over the scenario level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    match &scenario.source {
        Some(path) => debug!("Scenario loaded from {}", path.display()),
        None => debug!("Using built-in scenario"),
    }

    match cli.command {
        Commands::Transport { mode, format } => {
            commands::transport::run(&scenario.transport, &mode, &format)
        }
        Commands::Frontier {
            low,
            high,
            points,
            format,
            output,
        } => commands::frontier::run(
            &scenario.frontier,
            SweepArgs { low, high, points },
            &format,
            output.as_deref(),
        ),
        Commands::Check => commands::check::run(&scenario),
    }
}
