//! Check command implementation
//!
//! Validates the scenario without solving anything.

use std::io::Write;

use tracing::{info, warn};

use super::open_output;
use crate::config::ScenarioConfig;
use crate::Result;

/// Findings for one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    pub source: String,
    pub plants: usize,
    pub sites: usize,
    pub total_supply: f64,
    pub total_capacity: f64,
    pub assets: usize,
    pub return_range: (f64, f64),
}

impl CheckSummary {
    /// Whether site capacity covers all plant supply.
    pub fn is_balanced(&self) -> bool {
        self.total_supply <= self.total_capacity
    }
}

/// Build both models from the scenario, surfacing the first error.
pub fn check(config: &ScenarioConfig) -> Result<CheckSummary> {
    let network = config.transport.network()?;
    network.validate()?;
    config.transport.direct_cost_matrix()?;
    let universe = config.frontier.universe()?;

    Ok(CheckSummary {
        source: config
            .source
            .as_ref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        plants: network.plants().len(),
        sites: network.sites().len(),
        total_supply: network.total_supply(),
        total_capacity: network.total_capacity(),
        assets: universe.len(),
        return_range: (universe.min_return(), universe.max_return()),
    })
}

/// Run the check command
pub fn run(config: &ScenarioConfig) -> Result<()> {
    info!("Checking scenario...");
    let summary = check(config)?;
    if !summary.is_balanced() {
        warn!(
            supply = summary.total_supply,
            capacity = summary.total_capacity,
            "supply exceeds capacity; transport models will be infeasible"
        );
    }

    let mut out = open_output(None)?;
    writeln!(out, "Scenario: {}", summary.source)?;
    writeln!(out, "  log level        {}", config.log_level)?;
    writeln!(
        out,
        "  transport        {} plants, {} sites",
        summary.plants, summary.sites
    )?;
    writeln!(
        out,
        "  supply/capacity  {:.2} / {:.2}",
        summary.total_supply, summary.total_capacity
    )?;
    writeln!(
        out,
        "  frontier         {} assets, returns {:.4} to {:.4}",
        summary.assets, summary.return_range.0, summary.return_range.1
    )?;
    writeln!(out, "  status           ok")?;
    out.flush()?;
    Ok(())
}
