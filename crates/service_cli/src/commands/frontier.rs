//! Frontier command implementation
//!
//! Sweeps return targets over the scenario's asset universe and reports the
//! minimum-variance portfolio for each.

use std::io::Write;
use std::path::Path;

use optim_models::frontier::{
    return_targets, Asset, AssetUniverse, Frontier, FrontierSolver, PortfolioSolution,
};
use serde::Serialize;
use tracing::info;

use super::{open_output, timestamp, Format};
use crate::config::FrontierScenario;
use crate::{CliError, Result};

/// Sweep range overrides from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepArgs {
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub points: Option<usize>,
}

/// Frontier sweep with its universe and global minimum-variance portfolio.
#[derive(Debug, Clone, Serialize)]
pub struct FrontierReport<'a> {
    pub generated_at: String,
    pub assets: &'a [Asset],
    pub global_minimum: PortfolioSolution,
    pub frontier: Frontier,
}

/// Targets for the sweep; command-line values win over the scenario.
pub fn targets(
    scenario: &FrontierScenario,
    universe: &AssetUniverse,
    args: SweepArgs,
) -> Result<Vec<f64>> {
    let low = args
        .low
        .or(scenario.low)
        .unwrap_or_else(|| universe.min_return());
    let high = args
        .high
        .or(scenario.high)
        .unwrap_or_else(|| universe.max_return());
    let points = args.points.unwrap_or(scenario.points);

    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(CliError::InvalidArgument(format!(
            "Invalid target range: {} to {}",
            low, high
        )));
    }
    if points == 0 {
        return Err(CliError::InvalidArgument(
            "Number of points must be at least 1".to_string(),
        ));
    }
    Ok(return_targets(low, high, points))
}

/// Solve the sweep.
pub fn build_report<'a>(universe: &'a AssetUniverse, targets: &[f64]) -> Result<FrontierReport<'a>> {
    let solver = FrontierSolver::with_defaults();
    let global_minimum = solver.global_minimum_variance(universe)?;
    let frontier = solver.trace_frontier(universe, targets);
    info!(
        targets = frontier.len(),
        failed = frontier.failures().count(),
        "frontier traced"
    );

    Ok(FrontierReport {
        generated_at: timestamp(),
        assets: universe.assets(),
        global_minimum,
        frontier,
    })
}

/// Render the report as an aligned text table.
pub fn write_table(report: &FrontierReport<'_>, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Efficient frontier ({})", report.generated_at)?;
    writeln!(
        out,
        "Global minimum variance: risk {:.6}, return {:.6}",
        report.global_minimum.risk, report.global_minimum.expected_return
    )?;
    writeln!(out)?;

    write!(out, "{:>10} {:>10} {:>10}", "target", "risk", "return")?;
    for asset in report.assets {
        write!(out, " {:>10}", truncate(&asset.name, 10))?;
    }
    writeln!(out)?;

    for sample in report.frontier.samples() {
        write!(out, "{:>10.4}", sample.target)?;
        match &sample.outcome {
            Ok(point) => {
                write!(out, " {:>10.6} {:>10.6}", point.risk, point.achieved_return)?;
                for w in &point.weights {
                    write!(out, " {:>10.4}", w)?;
                }
                writeln!(out)?;
            }
            Err(err) => writeln!(out, "  {}", err)?,
        }
    }
    Ok(())
}

fn truncate(name: &str, width: usize) -> String {
    name.chars().take(width).collect()
}

/// Write one CSV record per target; failed targets leave the numbers empty.
pub fn write_csv(report: &FrontierReport<'_>, out: &mut dyn Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![
        "target".to_string(),
        "status".to_string(),
        "risk".to_string(),
        "achieved_return".to_string(),
    ];
    header.extend(report.assets.iter().map(|a| a.name.clone()));
    writer.write_record(&header)?;

    for sample in report.frontier.samples() {
        let mut record = vec![sample.target.to_string()];
        match &sample.outcome {
            Ok(point) => {
                record.push("ok".to_string());
                record.push(point.risk.to_string());
                record.push(point.achieved_return.to_string());
                record.extend(point.weights.iter().map(f64::to_string));
            }
            Err(err) => {
                record.push(err.to_string());
                record.extend(std::iter::repeat(String::new()).take(2 + report.assets.len()));
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Run the frontier command
pub fn run(
    scenario: &FrontierScenario,
    args: SweepArgs,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format = Format::parse(format, &[Format::Table, Format::Json, Format::Csv])?;
    let universe = scenario.universe()?;
    let targets = targets(scenario, &universe, args)?;
    info!(
        assets = universe.len(),
        points = targets.len(),
        format = format.as_str(),
        "Starting frontier sweep..."
    );

    let report = build_report(&universe, &targets)?;
    let mut out = open_output(output)?;
    match format {
        Format::Table => write_table(&report, &mut out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        Format::Csv => write_csv(&report, &mut out)?,
    }
    out.flush()?;

    if let Some(path) = output {
        info!("Frontier written to: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn universe() -> AssetUniverse {
        FrontierScenario::builtin().universe().unwrap()
    }

    #[test]
    fn test_default_targets_span_returns() {
        let scenario = FrontierScenario::builtin();
        let targets = targets(&scenario, &universe(), SweepArgs::default()).unwrap();
        assert_eq!(targets.len(), 15);
        assert_relative_eq!(targets[0], 0.06);
        assert_relative_eq!(targets[14], 0.15);
    }

    #[test]
    fn test_argument_overrides() {
        let scenario = FrontierScenario::builtin();
        let args = SweepArgs {
            low: Some(0.08),
            high: None,
            points: Some(3),
        };
        let targets = targets(&scenario, &universe(), args).unwrap();
        assert_eq!(targets.len(), 3);
        assert_relative_eq!(targets[0], 0.08);
        assert_relative_eq!(targets[2], 0.15);

        let reversed = SweepArgs {
            low: Some(0.2),
            high: Some(0.1),
            points: None,
        };
        assert!(targets_err(&scenario, reversed));
        let empty = SweepArgs {
            points: Some(0),
            ..SweepArgs::default()
        };
        assert!(targets_err(&scenario, empty));
    }

    fn targets_err(scenario: &FrontierScenario, args: SweepArgs) -> bool {
        matches!(
            targets(scenario, &universe(), args),
            Err(CliError::InvalidArgument(_))
        )
    }

    #[test]
    fn test_report_on_builtin_universe() {
        let universe = universe();
        let report = build_report(&universe, &[0.07, 0.11, 0.16]).unwrap();
        assert_relative_eq!(report.global_minimum.risk, 0.11384496779510213, epsilon = 1e-8);
        assert_eq!(report.frontier.len(), 3);
        assert_eq!(report.frontier.failures().count(), 1);
        let risk_011 = report.frontier.samples()[1].point().unwrap().risk;
        assert_relative_eq!(risk_011, 0.17797264330153584, epsilon = 1e-8);
    }

    #[test]
    fn test_csv_output() {
        let universe = universe();
        let report = build_report(&universe, &[0.10, 0.20]).unwrap();
        let mut buffer = Vec::new();
        write_csv(&report, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "target,status,risk,achieved_return,Bonds,Credit,Equity,Cash Plus"
        );
        assert!(lines[1].starts_with("0.1,ok,"));
        assert!(lines[2].starts_with("0.2,Infeasible model"));
        assert!(lines[2].ends_with(",,,,,"));
    }

    #[test]
    fn test_table_output() {
        let universe = universe();
        let report = build_report(&universe, &[0.10]).unwrap();
        let mut buffer = Vec::new();
        write_table(&report, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Global minimum variance"));
        assert!(text.contains("Equity"));
    }

    #[test]
    fn test_json_output() {
        let universe = universe();
        let report = build_report(&universe, &[0.10]).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["assets"][0]["name"], "Bonds");
        assert!(value["frontier"]["samples"][0]["outcome"]["Ok"]["risk"].is_number());
    }
}
