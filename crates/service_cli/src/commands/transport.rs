//! Transport command implementation
//!
//! Solves the scenario's waste-disposal network as a direct transportation
//! problem, as a transshipment problem, or both, and reports the routes.

use std::io::Write;
use std::str::FromStr;

use optim_models::transport::{DirectSolution, FlowSolution, TransportSolver, TransshipmentSolution};
use serde::Serialize;
use tracing::{info, warn};

use super::{open_output, timestamp, Format};
use crate::config::TransportScenario;
use crate::{CliError, Result};

/// Which transport models to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Direct,
    Transshipment,
    Both,
}

impl FromStr for Mode {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Mode::Direct),
            "transshipment" => Ok(Mode::Transshipment),
            "both" => Ok(Mode::Both),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown mode: {}. Supported: direct, transshipment, both",
                other
            ))),
        }
    }
}

/// One shipped quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub from: String,
    pub to: String,
    pub flow: f64,
}

/// Summary of one solved model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    pub model: &'static str,
    pub total_cost: f64,
    /// Cost excluding dummy arcs
    pub real_cost: f64,
    pub spare_capacity: f64,
    pub uses_disallowed_arcs: bool,
    pub routes: Vec<Route>,
}

fn routes(flows: &FlowSolution) -> Vec<Route> {
    flows
        .routes()
        .map(|(from, to, flow)| Route {
            from: from.to_string(),
            to: to.to_string(),
            flow,
        })
        .collect()
}

impl ModelReport {
    fn direct(solution: &DirectSolution, scenario: &TransportScenario) -> Result<Self> {
        let flows = solution
            .flows
            .clone()
            .relabel(scenario.plants.clone(), scenario.sites.clone())?;
        let capacity: f64 = scenario.capacity.iter().sum();
        Ok(Self {
            model: "direct",
            total_cost: solution.total_cost,
            real_cost: solution.total_cost,
            spare_capacity: capacity - flows.total_shipped(),
            uses_disallowed_arcs: false,
            routes: routes(&flows),
        })
    }

    fn transshipment(solution: &TransshipmentSolution) -> Self {
        Self {
            model: "transshipment",
            total_cost: solution.total_cost(),
            real_cost: solution.real_cost(),
            spare_capacity: solution.dummy_flow(),
            uses_disallowed_arcs: solution.uses_disallowed_arcs(),
            routes: routes(&solution.without_dummy()),
        }
    }
}

/// Full transport report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportReport {
    pub generated_at: String,
    pub models: Vec<ModelReport>,
}

/// Solve the models selected by `mode`.
pub fn build_report(scenario: &TransportScenario, mode: Mode) -> Result<TransportReport> {
    let solver = TransportSolver::new(scenario.solver_config());
    let mut models = Vec::new();

    if matches!(mode, Mode::Direct | Mode::Both) {
        let solution = solver.solve_direct(
            &scenario.direct_cost_matrix()?,
            &scenario.supply,
            &scenario.capacity,
        )?;
        info!(total_cost = solution.total_cost, "direct model solved");
        models.push(ModelReport::direct(&solution, scenario)?);
    }

    if matches!(mode, Mode::Transshipment | Mode::Both) {
        let solution = solver.solve_transshipment(&scenario.network()?)?;
        info!(
            total_cost = solution.total_cost(),
            dummy_flow = solution.dummy_flow(),
            "transshipment model solved"
        );
        if solution.uses_disallowed_arcs() {
            warn!(
                flow = solution.disallowed_flow(),
                "optimal flow uses sentinel-priced arcs"
            );
        }
        models.push(ModelReport::transshipment(&solution));
    }

    Ok(TransportReport {
        generated_at: timestamp(),
        models,
    })
}

/// Render the report as aligned text tables.
pub fn write_table(report: &TransportReport, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Transport report ({})", report.generated_at)?;
    for model in &report.models {
        writeln!(out)?;
        writeln!(out, "[{}]", model.model)?;
        writeln!(out, "  total cost      {:>12.2}", model.total_cost)?;
        writeln!(out, "  real cost       {:>12.2}", model.real_cost)?;
        writeln!(out, "  spare capacity  {:>12.2}", model.spare_capacity)?;
        if model.uses_disallowed_arcs {
            writeln!(out, "  WARNING: flow on disallowed arcs")?;
        }
        writeln!(out, "  {:<12} {:<12} {:>10}", "from", "to", "flow")?;
        for route in &model.routes {
            writeln!(out, "  {:<12} {:<12} {:>10.2}", route.from, route.to, route.flow)?;
        }
    }
    Ok(())
}

/// Run the transport command
pub fn run(scenario: &TransportScenario, mode: &str, format: &str) -> Result<()> {
    let mode = Mode::from_str(mode)?;
    let format = Format::parse(format, &[Format::Table, Format::Json])?;
    info!(?mode, format = format.as_str(), "Starting transport solve...");

    let report = build_report(scenario, mode)?;
    let mut out = open_output(None)?;
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        _ => write_table(&report, &mut out)?,
    }
    out.flush()?;

    info!("Transport report complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use optim_models::transport::DUMMY_NODE;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(Mode::from_str("Direct").unwrap(), Mode::Direct);
        assert_eq!(Mode::from_str("both").unwrap(), Mode::Both);
        assert!(Mode::from_str("rail").is_err());
    }

    #[test]
    fn test_report_on_builtin_scenario() {
        let report = build_report(&TransportScenario::builtin(), Mode::Both).unwrap();
        assert_eq!(report.models.len(), 2);

        let direct = &report.models[0];
        assert_relative_eq!(direct.total_cost, 2879.0, epsilon = 1e-6);
        assert_relative_eq!(direct.spare_capacity, 17.0, epsilon = 1e-6);
        assert!(direct.routes.iter().all(|r| r.from.starts_with("Plant")));

        let network = &report.models[1];
        assert_relative_eq!(network.total_cost, 2871.0, epsilon = 1e-6);
        assert_relative_eq!(network.spare_capacity, 17.0, epsilon = 1e-6);
        assert!(!network.uses_disallowed_arcs);
        assert!(network.routes.iter().all(|r| r.from != DUMMY_NODE));
    }

    #[test]
    fn test_oversupply_is_reported() {
        let scenario = TransportScenario {
            capacity: vec![10.0, 10.0, 10.0],
            ..TransportScenario::builtin()
        };
        let err = build_report(&scenario, Mode::Direct).unwrap_err();
        assert!(matches!(err, CliError::Model(e) if e.is_infeasible()));
    }

    #[test]
    fn test_two_plant_scenario() {
        let scenario = TransportScenario {
            plants: vec!["North".to_string(), "South".to_string()],
            sites: vec!["Landfill".to_string()],
            supply: vec![3.0, 4.0],
            capacity: vec![10.0],
            direct_costs: vec![vec![2.0], vec![5.0]],
            plant_costs: None,
            site_costs: None,
            dummy_costs: None,
            sentinel_cost: None,
        };
        let report = build_report(&scenario, Mode::Both).unwrap();
        for model in &report.models {
            assert_relative_eq!(model.total_cost, 26.0, epsilon = 1e-9);
            assert_relative_eq!(model.spare_capacity, 3.0, epsilon = 1e-9);
            assert!(model.routes.iter().all(|r| r.to == "Landfill"));
        }
    }

    #[test]
    fn test_table_output() {
        let report = build_report(&TransportScenario::builtin(), Mode::Direct).unwrap();
        let mut buffer = Vec::new();
        write_table(&report, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("[direct]"));
        assert!(text.contains("2879.00"));
        assert!(!text.contains("[transshipment]"));
    }

    #[test]
    fn test_json_output() {
        let report = build_report(&TransportScenario::builtin(), Mode::Transshipment).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["models"][0]["model"], "transshipment");
        assert!(value["models"][0]["routes"].as_array().unwrap().len() > 1);
    }
}
